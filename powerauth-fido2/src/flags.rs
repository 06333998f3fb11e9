use bitflags::bitflags;

bitflags! {
    /// Flags byte of the authenticator data.
    ///
    /// Bits 1 and 5 are reserved; a payload with either set is rejected
    /// during parsing rather than silently masked.
    ///
    /// <https://w3c.github.io/webauthn/#authdata-flags>
    #[repr(transparent)]
    #[derive(Debug, PartialEq, Eq, Clone, Copy)]
    pub struct Flags: u8 {
        /// User Present, bit 0
        const UP = 1 << 0;
        /// User Verified, bit 2
        const UV = 1 << 2;
        /// Backup Eligibility, bit 3
        const BE = 1 << 3;
        /// Backup State, bit 4
        const BS = 1 << 4;
        /// Attested Credential Data included, bit 6
        const AT = 1 << 6;
        /// Extension Data included, bit 7
        const ED = 1 << 7;
    }
}

impl Flags {
    /// Whether the user was present during the ceremony.
    pub fn user_present(&self) -> bool {
        self.contains(Flags::UP)
    }

    /// Whether the user was verified (PIN, biometry) during the ceremony.
    pub fn user_verified(&self) -> bool {
        self.contains(Flags::UV)
    }
}

impl From<Flags> for u8 {
    fn from(src: Flags) -> Self {
        src.bits()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reserved_bits_do_not_parse() {
        assert!(Flags::from_bits(1 << 1).is_none());
        assert!(Flags::from_bits(1 << 5).is_none());
    }

    #[test]
    fn accessor_helpers() {
        let flags = Flags::UP | Flags::UV;
        assert!(flags.user_present());
        assert!(flags.user_verified());
        assert!(!Flags::UP.user_verified());
    }
}
