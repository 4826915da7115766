//! CLI enum types and value parsers for the convert command.

use clap::ValueEnum;
use coco2voc_core::Colormap;

/// Colour maps selectable with `--colormap`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ColormapArg {
    Inferno,
    Magma,
    Plasma,
    Viridis,
    Cividis,
    Turbo,
}

impl From<ColormapArg> for Colormap {
    fn from(arg: ColormapArg) -> Self {
        match arg {
            ColormapArg::Inferno => Colormap::Inferno,
            ColormapArg::Magma => Colormap::Magma,
            ColormapArg::Plasma => Colormap::Plasma,
            ColormapArg::Viridis => Colormap::Viridis,
            ColormapArg::Cividis => Colormap::Cividis,
            ColormapArg::Turbo => Colormap::Turbo,
        }
    }
}

impl std::fmt::Display for ColormapArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", Colormap::from(*self))
    }
}

/// Parse a strictly positive integer (`--limit`, `--progress-interval`).
pub fn parse_positive(s: &str) -> Result<usize, String> {
    let value: usize = s
        .trim()
        .parse()
        .map_err(|_| format!("`{s}` is not a positive integer"))?;
    if value == 0 {
        return Err("value must be at least 1".to_string());
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_positive() {
        assert_eq!(parse_positive("10"), Ok(10));
        assert_eq!(parse_positive(" 3 "), Ok(3));
        assert!(parse_positive("0").is_err());
        assert!(parse_positive("-4").is_err());
        assert!(parse_positive("2.5").is_err());
        assert!(parse_positive("all").is_err());
    }

    #[test]
    fn test_colormap_arg_matches_core_names() {
        for arg in ColormapArg::value_variants() {
            let name = arg.to_possible_value().unwrap().get_name().to_string();
            assert_eq!(Colormap::parse(&name), Some(Colormap::from(*arg)));
        }
    }
}
