/// Configuration for script verification.
///
/// Each flag is an independent boolean. The default configuration has every flag off, which
/// matches the permissive historic behavior.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct VerifyFlags {
    /// Require that data pushes and numeric operands use their shortest encoding.
    ///
    /// Violations fail with [crate::Error::MinimalEncoding].
    pub verify_minimal_push: bool,
    /// Require signatures to be strictly DER encoded and public keys to have a standard form.
    pub strict_encoding: bool,
    /// Require the main stack to contain exactly one cell after execution.
    pub require_clean_stack: bool,
}

impl VerifyFlags {
    /// The strict configuration with every check enabled.
    pub fn strict() -> Self {
        Self {
            verify_minimal_push: true,
            strict_encoding: true,
            require_clean_stack: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_off() {
        let flags = VerifyFlags::default();
        assert!(!flags.verify_minimal_push);
        assert!(!flags.strict_encoding);
        assert!(!flags.require_clean_stack);
        assert!(VerifyFlags::strict().verify_minimal_push);
    }
}
