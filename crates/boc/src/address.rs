use std::{fmt, str::FromStr};

use base64::{engine::general_purpose, Engine as _};

use crate::AddressParseError;

const FRIENDLY_LEN: usize = 36;
const TAG_BOUNCEABLE: u8 = 0x11;
const TAG_NON_BOUNCEABLE: u8 = 0x51;
const TAG_TESTNET: u8 = 0x80;

/// A standard chain address: signed 8-bit workchain plus 256-bit account
/// hash.
///
/// Two textual encodings exist and round-trip to the same address: the raw
/// `wc:hex` form and the 48-character "friendly" base64url form carrying a
/// tag byte and a CRC16 checksum. Equality ignores which encoding an
/// address was parsed from.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct TonAddress {
    pub workchain: i8,
    pub hash: [u8; 32],
}

impl TonAddress {
    /// The zero address of the base workchain.
    pub const NULL: Self = Self { workchain: 0, hash: [0; 32] };

    pub const fn new(workchain: i8, hash: [u8; 32]) -> Self {
        Self { workchain, hash }
    }

    /// Raw textual form, `wc:hex`.
    pub fn to_raw(&self) -> String {
        format!("{}:{}", self.workchain, hex::encode(self.hash))
    }

    /// Friendly base64url form with the given bounceable flag (mainnet).
    pub fn to_friendly(&self, bounceable: bool) -> String {
        self.to_friendly_with(bounceable, false)
    }

    pub fn to_friendly_with(&self, bounceable: bool, testnet: bool) -> String {
        let mut payload = [0u8; FRIENDLY_LEN];
        payload[0] = if bounceable { TAG_BOUNCEABLE } else { TAG_NON_BOUNCEABLE };
        if testnet {
            payload[0] |= TAG_TESTNET;
        }
        payload[1] = self.workchain as u8;
        payload[2..34].copy_from_slice(&self.hash);
        let crc = crc16_xmodem(&payload[..34]);
        payload[34..].copy_from_slice(&crc.to_be_bytes());
        general_purpose::URL_SAFE_NO_PAD.encode(payload)
    }

    fn parse_raw(s: &str) -> Result<Self, AddressParseError> {
        let (wc, hash_hex) = s
            .split_once(':')
            .ok_or_else(|| AddressParseError::UnknownFormat(s.to_owned()))?;
        let workchain =
            wc.parse::<i8>().map_err(|_| AddressParseError::InvalidWorkchain(wc.to_owned()))?;
        let bytes = hex::decode(hash_hex)?;
        let hash: [u8; 32] =
            bytes.try_into().map_err(|b: Vec<u8>| AddressParseError::InvalidLength(b.len()))?;
        Ok(Self { workchain, hash })
    }

    fn parse_friendly(s: &str) -> Result<Self, AddressParseError> {
        // Both base64 alphabets circulate in the wild; try url-safe first.
        let payload = match general_purpose::URL_SAFE_NO_PAD.decode(s) {
            Ok(bytes) => bytes,
            Err(_) => general_purpose::STANDARD_NO_PAD.decode(s)?,
        };
        if payload.len() != FRIENDLY_LEN {
            return Err(AddressParseError::InvalidLength(payload.len()));
        }
        let crc = u16::from_be_bytes([payload[34], payload[35]]);
        if crc != crc16_xmodem(&payload[..34]) {
            return Err(AddressParseError::ChecksumMismatch);
        }
        let tag = payload[0] & !TAG_TESTNET;
        if tag != TAG_BOUNCEABLE && tag != TAG_NON_BOUNCEABLE {
            return Err(AddressParseError::UnknownTag(payload[0]));
        }
        let workchain = payload[1] as i8;
        let mut hash = [0u8; 32];
        hash.copy_from_slice(&payload[2..34]);
        Ok(Self { workchain, hash })
    }
}

impl FromStr for TonAddress {
    type Err = AddressParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.contains(':') {
            Self::parse_raw(s)
        } else if s.len() == 48 {
            Self::parse_friendly(s)
        } else {
            Err(AddressParseError::UnknownFormat(s.to_owned()))
        }
    }
}

impl fmt::Display for TonAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_raw())
    }
}

impl fmt::Debug for TonAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TonAddress({self})")
    }
}

/// CRC16/XMODEM over the 34-byte friendly-address payload (poly 0x1021,
/// zero initial value).
fn crc16_xmodem(data: &[u8]) -> u16 {
    let mut crc: u16 = 0;
    for &byte in data {
        crc ^= (byte as u16) << 8;
        for _ in 0..8 {
            crc = if crc & 0x8000 != 0 { crc << 1 ^ 0x1021 } else { crc << 1 };
        }
    }
    crc
}

#[cfg(test)]
mod tests {
    use super::*;

    const HASH: [u8; 32] = [0x42; 32];

    #[test]
    fn raw_round_trip() {
        let addr = TonAddress::new(0, HASH);
        assert_eq!(addr.to_raw().parse::<TonAddress>().unwrap(), addr);

        let master = TonAddress::new(-1, HASH);
        assert!(master.to_raw().starts_with("-1:"));
        assert_eq!(master.to_raw().parse::<TonAddress>().unwrap(), master);
    }

    #[test]
    fn friendly_round_trip_and_equivalence() {
        let addr = TonAddress::new(0, HASH);
        let bounceable = addr.to_friendly(true);
        let non_bounceable = addr.to_friendly(false);

        assert_eq!(bounceable.len(), 48);
        assert!(bounceable.starts_with("EQ"));
        assert!(non_bounceable.starts_with("UQ"));

        // Both friendly flavors and the raw form parse to the same address.
        assert_eq!(bounceable.parse::<TonAddress>().unwrap(), addr);
        assert_eq!(non_bounceable.parse::<TonAddress>().unwrap(), addr);
        assert_eq!(addr.to_raw().parse::<TonAddress>().unwrap(), addr);
    }

    #[test]
    fn corrupted_checksum_is_rejected() {
        let addr = TonAddress::new(0, HASH);
        let mut friendly = addr.to_friendly(true).into_bytes();
        // Flip a base64 character inside the hash area.
        friendly[10] = if friendly[10] == b'A' { b'B' } else { b'A' };
        let corrupted = String::from_utf8(friendly).unwrap();
        assert_eq!(
            corrupted.parse::<TonAddress>().unwrap_err(),
            AddressParseError::ChecksumMismatch
        );
    }

    #[test]
    fn testnet_tag_round_trips() {
        let addr = TonAddress::new(0, HASH);
        let testnet = addr.to_friendly_with(true, true);
        assert_eq!(testnet.parse::<TonAddress>().unwrap(), addr);
    }

    #[test]
    fn bad_inputs_are_typed_errors() {
        assert!(matches!(
            "hello".parse::<TonAddress>().unwrap_err(),
            AddressParseError::UnknownFormat(_)
        ));
        assert!(matches!(
            "x:0042".parse::<TonAddress>().unwrap_err(),
            AddressParseError::InvalidWorkchain(_)
        ));
        assert!(matches!(
            "0:abcd".parse::<TonAddress>().unwrap_err(),
            AddressParseError::InvalidLength(2)
        ));
        let err = "0:zz".parse::<TonAddress>().unwrap_err();
        assert_eq!(err, err.clone());
        assert!(matches!(err, AddressParseError::InvalidHex(_)));
    }
}
