//! C# language level model.
//!
//! Onyx parses a *superset* grammar (modern C#) and gates what rewrites are
//! allowed to produce on the configured per-project language level. This
//! module is the canonical source of truth for "which language version
//! enables which construct?".

/// The effective C# language mode for a project/file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CSharpLanguageLevel {
    /// The language major version (6, 7, 8, 9, 10, ...).
    pub major: u16,
}

impl CSharpLanguageLevel {
    pub const CSHARP_6: Self = Self { major: 6 };
    pub const CSHARP_7: Self = Self { major: 7 };
    pub const CSHARP_8: Self = Self { major: 8 };
    pub const CSHARP_10: Self = Self { major: 10 };

    pub fn supports(self, feature: Feature) -> bool {
        self.major >= feature.stable_since()
    }
}

impl Default for CSharpLanguageLevel {
    fn default() -> Self {
        CSharpLanguageLevel::CSHARP_10
    }
}

/// Language constructs the rewrite layer can emit conditionally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Feature {
    /// `x is null` constant patterns.
    IsNullPattern,
    /// Expression-bodied accessors and constructors.
    ExpressionBodiedMembers,
    /// `namespace N;` file-scoped namespace declarations.
    FileScopedNamespaces,
}

impl Feature {
    pub const fn stable_since(self) -> u16 {
        match self {
            Feature::IsNullPattern => 7,
            Feature::ExpressionBodiedMembers => 7,
            Feature::FileScopedNamespaces => 10,
        }
    }

    pub const fn display_name(self) -> &'static str {
        match self {
            Feature::IsNullPattern => "`is null` patterns",
            Feature::ExpressionBodiedMembers => "expression-bodied members",
            Feature::FileScopedNamespaces => "file-scoped namespaces",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn feature_gating() {
        assert!(!CSharpLanguageLevel::CSHARP_6.supports(Feature::IsNullPattern));
        assert!(CSharpLanguageLevel::CSHARP_7.supports(Feature::IsNullPattern));
        assert!(CSharpLanguageLevel::default().supports(Feature::FileScopedNamespaces));
    }
}
