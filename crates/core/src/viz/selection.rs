use glob::Pattern;
use regex::Regex;
use thiserror::Error;

/// Chooses which history columns are visualized.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SeriesSelection {
    /// Every column.
    #[default]
    All,

    /// Columns whose full name matches the regular expression.
    Regex(String),

    /// Columns matching any of the shell-style patterns, such as `"*.i"`.
    Globs(Vec<String>),
}

/// A selection pattern that failed to compile.
#[derive(Debug, Error)]
pub enum SelectionError {
    #[error("invalid regex: {0}")]
    Regex(#[from] regex::Error),

    #[error("invalid glob: {0}")]
    Glob(#[from] glob::PatternError),
}

impl SeriesSelection {
    /// Compiles the selection into a filter.
    ///
    /// # Errors
    ///
    /// Returns a [`SelectionError`] if the regular expression or any glob
    /// pattern is invalid.
    pub fn compile(&self) -> Result<ColumnFilter, SelectionError> {
        match self {
            Self::All => Ok(ColumnFilter::All),
            Self::Regex(pattern) => {
                let regex = Regex::new(&format!("^(?:{pattern})$"))?;
                Ok(ColumnFilter::Regex(regex))
            }
            Self::Globs(globs) => {
                let patterns = globs
                    .iter()
                    .map(|glob| Pattern::new(glob))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(ColumnFilter::Globs(patterns))
            }
        }
    }
}

/// A compiled [`SeriesSelection`].
#[derive(Debug, Clone, Default)]
pub enum ColumnFilter {
    #[default]
    All,
    Regex(Regex),
    Globs(Vec<Pattern>),
}

impl ColumnFilter {
    /// Returns `true` if the whole column name is selected.
    #[must_use]
    pub fn matches(&self, name: &str) -> bool {
        match self {
            Self::All => true,
            Self::Regex(regex) => regex.is_match(name),
            Self::Globs(patterns) => patterns.iter().any(|pattern| pattern.matches(name)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn selects(selection: &SeriesSelection, name: &str) -> bool {
        selection.compile().unwrap().matches(name)
    }

    #[test]
    fn all_matches_everything() {
        assert!(selects(&SeriesSelection::All, "anything.at.all"));
    }

    #[test]
    fn regex_must_match_whole_name() {
        let selection = SeriesSelection::Regex(r"lc\.i.".into());

        assert!(selects(&selection, "lc.i1"));
        assert!(!selects(&selection, "lc.i10"));
        assert!(!selects(&selection, "x.lc.i1"));
    }

    #[test]
    fn globs_match_suffix_patterns() {
        let selection = SeriesSelection::Globs(vec!["*.i".into(), "v?".into()]);

        assert!(selects(&selection, "inductor1.i"));
        assert!(selects(&selection, "v1"));
        assert!(!selects(&selection, "inductor1.v"));
        assert!(!selects(&selection, "v12"));
    }

    #[test]
    fn glob_dot_is_literal() {
        let selection = SeriesSelection::Globs(vec!["a.b".into()]);

        assert!(selects(&selection, "a.b"));
        assert!(!selects(&selection, "axb"));
    }

    #[test]
    fn glob_character_classes() {
        let selection = SeriesSelection::Globs(vec!["i[12]".into(), "v[!0]".into()]);

        assert!(selects(&selection, "i1"));
        assert!(!selects(&selection, "i3"));
        assert!(selects(&selection, "v5"));
        assert!(!selects(&selection, "v0"));
    }

    #[test]
    fn empty_glob_list_selects_nothing() {
        assert!(!selects(&SeriesSelection::Globs(Vec::new()), "x"));
    }

    #[test]
    fn unterminated_bracket_fails_to_compile() {
        let err = SeriesSelection::Globs(vec!["a[b".into()])
            .compile()
            .unwrap_err();

        assert!(matches!(err, SelectionError::Glob(_)));
    }

    #[test]
    fn invalid_regex_fails_to_compile() {
        let err = SeriesSelection::Regex("(".into()).compile().unwrap_err();

        assert!(matches!(err, SelectionError::Regex(_)));
    }
}
