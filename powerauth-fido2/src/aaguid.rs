use uuid::Uuid;

/// An Authenticator Attestation GUID, the 128-bit identifier of an
/// authenticator model.
///
/// Authenticators doing self attestation report an all-zero AAGUID; the
/// registry maps such (and any unrecognized) values to the unknown sentinel
/// rather than failing.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Aaguid(pub [u8; Self::LEN]);

impl Aaguid {
    /// Byte length of an AAGUID.
    pub const LEN: usize = 16;

    /// The all-zero AAGUID used with self or no attestation.
    pub const fn zero() -> Self {
        Self([0; Self::LEN])
    }

    /// Whether this is the all-zero AAGUID.
    pub fn is_zero(&self) -> bool {
        self.0 == [0; Self::LEN]
    }

    /// View the AAGUID as a UUID.
    pub fn to_uuid(self) -> Uuid {
        Uuid::from_bytes(self.0)
    }
}

impl Default for Aaguid {
    fn default() -> Self {
        Self::zero()
    }
}

impl From<[u8; 16]> for Aaguid {
    fn from(inner: [u8; 16]) -> Self {
        Aaguid(inner)
    }
}

impl From<Uuid> for Aaguid {
    fn from(uuid: Uuid) -> Self {
        Aaguid(uuid.into_bytes())
    }
}

impl std::fmt::Display for Aaguid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.to_uuid().hyphenated().fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn displays_as_hyphenated_uuid() {
        let aaguid = Aaguid([
            0xdc, 0xa0, 0x9b, 0xa7, 0x49, 0x92, 0x4b, 0xe8, 0x92, 0x83, 0xee, 0x98, 0xcd, 0x6f,
            0xb5, 0x29,
        ]);
        assert_eq!(aaguid.to_string(), "dca09ba7-4992-4be8-9283-ee98cd6fb529");
    }

    #[test]
    fn zero_round_trip() {
        assert!(Aaguid::zero().is_zero());
        assert_eq!(Aaguid::from(Uuid::nil()), Aaguid::zero());
    }
}
