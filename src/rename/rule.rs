use std::fmt;

use crate::config::{ConfigError, validate_prefix};
use crate::listing::split_extension;

pub const DEFAULT_PREFIX: &str = "Amite";

/// Literal placed in front of the datatype in a conformed name.
const DATATYPE_MARKER: &str = "Max";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameParts {
    pub period: String,
    pub source: String,
    pub datatype: String,
    pub extension: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedName {
    /// At least three underscore tokens, not yet in the project form.
    Raw(NameParts),
    /// Already `<prefix>_<period>_<source>_Max<datatype><ext>`.
    Conformed(NameParts),
    /// Fewer than three tokens, or a name the convention cannot round-trip.
    Unrecognized,
}

/// Filename convention for raster deliverables:
/// `<period>_<source>_<datatype>[_...].<ext>` becomes
/// `<prefix>_<period>_<source>_Max<datatype>.<ext>`.
///
/// Names already in the target form are recognised and kept, so applying
/// the rule twice gives the same result as applying it once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamingConvention {
    prefix: String,
}

impl Default for NamingConvention {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_PREFIX.to_string(),
        }
    }
}

impl NamingConvention {
    pub fn new(prefix: impl Into<String>) -> Result<Self, ConfigError> {
        let prefix = prefix.into();
        validate_prefix(&prefix)?;
        Ok(Self { prefix })
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn parse(&self, file_name: &str) -> ParsedName {
        let (base, ext) = split_extension(file_name);

        if let Some(parts) = self.parse_conformed(base, ext) {
            return ParsedName::Conformed(parts);
        }

        let mut tokens = base.split('_');
        let (Some(period), Some(source), Some(datatype)) =
            (tokens.next(), tokens.next(), tokens.next())
        else {
            return ParsedName::Unrecognized;
        };

        let parts = NameParts {
            period: period.to_string(),
            source: source.to_string(),
            datatype: datatype.to_string(),
            extension: ext.to_string(),
        };

        // A leading-dot base with no extension can format into a name whose
        // last dot moves the extension split; such names are not renamed.
        let renamed = self.format(&parts);
        let (new_base, new_ext) = split_extension(&renamed);
        if self.parse_conformed(new_base, new_ext).is_some() {
            ParsedName::Raw(parts)
        } else {
            ParsedName::Unrecognized
        }
    }

    fn parse_conformed(&self, base: &str, ext: &str) -> Option<NameParts> {
        let rest = base
            .strip_prefix(self.prefix.as_str())?
            .strip_prefix('_')?;

        let tokens: Vec<&str> = rest.split('_').collect();
        let [period, source, marked] = tokens.as_slice() else {
            return None;
        };
        let datatype = marked.strip_prefix(DATATYPE_MARKER)?;

        Some(NameParts {
            period: period.to_string(),
            source: source.to_string(),
            datatype: datatype.to_string(),
            extension: ext.to_string(),
        })
    }

    pub fn format(&self, parts: &NameParts) -> String {
        format!(
            "{}_{}_{}_{}{}{}",
            self.prefix, parts.period, parts.source, DATATYPE_MARKER, parts.datatype, parts.extension
        )
    }

    /// New name for `file_name`, or the name itself when it is already
    /// conformed or does not follow the convention.
    pub fn rename_file(&self, file_name: &str) -> String {
        match self.parse(file_name) {
            ParsedName::Raw(parts) => self.format(&parts),
            ParsedName::Conformed(_) | ParsedName::Unrecognized => file_name.to_string(),
        }
    }
}

impl fmt::Display for NamingConvention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}_<period>_<source>_{}<datatype>",
            self.prefix, DATATYPE_MARKER
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rename_raw_name() {
        let convention = NamingConvention::default();

        assert_eq!(
            convention.rename_file("202309_NOAA_precip.tif"),
            "Amite_202309_NOAA_Maxprecip.tif"
        );
        assert_eq!(
            convention.rename_file("202309_NOAA_precip.vrt"),
            "Amite_202309_NOAA_Maxprecip.vrt"
        );
    }

    #[test]
    fn test_single_token_unchanged() {
        let convention = NamingConvention::default();

        assert_eq!(convention.rename_file("justonename.tif"), "justonename.tif");
        assert_eq!(convention.rename_file("two_tokens.tif"), "two_tokens.tif");
        assert_eq!(
            convention.parse("justonename.tif"),
            ParsedName::Unrecognized
        );
    }

    #[test]
    fn test_extra_tokens_dropped() {
        let convention = NamingConvention::default();

        assert_eq!(
            convention.rename_file("202309_NOAA_precip_v2_final.tif"),
            "Amite_202309_NOAA_Maxprecip.tif"
        );
    }

    #[test]
    fn test_conformed_name_recognised() {
        let convention = NamingConvention::default();

        assert_eq!(
            convention.parse("Amite_202309_NOAA_Maxprecip.tif"),
            ParsedName::Conformed(NameParts {
                period: "202309".to_string(),
                source: "NOAA".to_string(),
                datatype: "precip".to_string(),
                extension: ".tif".to_string(),
            })
        );
    }

    #[test]
    fn test_prefix_lookalike_is_raw() {
        let convention = NamingConvention::default();

        // Shares the prefix text but not the prefix token.
        assert_eq!(
            convention.rename_file("Amiteville_202309_NOAA.tif"),
            "Amite_Amiteville_202309_MaxNOAA.tif"
        );
    }

    #[test]
    fn test_prefix_with_underscore() {
        let convention = NamingConvention::new("Amite_River").unwrap();
        let once = convention.rename_file("202309_NOAA_precip.tif");

        assert_eq!(once, "Amite_River_202309_NOAA_Maxprecip.tif");
        assert_eq!(convention.rename_file(&once), once);
    }

    #[test]
    fn test_leading_dot_name_left_alone() {
        let convention = NamingConvention::new("Amite_River").unwrap();

        assert_eq!(convention.parse("..a_b_c"), ParsedName::Unrecognized);
        assert_eq!(convention.rename_file("..a_b_c"), "..a_b_c");
    }

    #[test]
    fn test_invalid_prefix() {
        assert!(NamingConvention::new("").is_err());
        assert!(NamingConvention::new("Amite_").is_err());
    }

    #[test]
    fn test_rename_is_idempotent() {
        let tokens = [
            "", "202309", "NOAA", "precip", "Amite", "Max", "Maxprecip", "a.b", "..x", ".",
        ];
        let extensions = ["", ".tif", ".vrt", ".tar.gz", "."];
        let conventions = [
            NamingConvention::default(),
            NamingConvention::new("Amite_River").unwrap(),
            NamingConvention::new("Max").unwrap(),
        ];

        let mut names = Vec::new();
        for count in 1..=4 {
            let mut stack: Vec<Vec<&str>> = vec![vec![]];
            for _ in 0..count {
                stack = stack
                    .into_iter()
                    .flat_map(|prefix| {
                        tokens.iter().map(move |token| {
                            let mut next = prefix.clone();
                            next.push(*token);
                            next
                        })
                    })
                    .collect();
            }
            for parts in stack {
                for ext in extensions {
                    names.push(format!("{}{}", parts.join("_"), ext));
                }
            }
        }
        names.push(".hidden".to_string());
        names.push("Amite_202309_NOAA_Maxprecip_extra.tif".to_string());

        for convention in &conventions {
            for name in &names {
                let once = convention.rename_file(name);
                let twice = convention.rename_file(&once);
                assert_eq!(
                    once, twice,
                    "not idempotent for {:?} with prefix {:?}",
                    name,
                    convention.prefix()
                );
            }
        }
    }
}
