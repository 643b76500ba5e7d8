//! Grammar helper for file-count messages.

/// Suffix for a counted noun: `"1 file"` but `"3 files"` (and `"0 files"`).
#[inline]
pub const fn plural_s(n: usize) -> &'static str {
    if n == 1 { "" } else { "s" }
}

#[cfg(test)]
mod tests {
    use super::plural_s;

    #[test]
    fn test_plural_suffix() {
        assert_eq!(plural_s(0), "s");
        assert_eq!(plural_s(1), "");
        assert_eq!(plural_s(7), "s");
    }
}
