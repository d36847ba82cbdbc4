use crate::config::BuildConfig;
use crate::error::{Error, Result};
use crate::types::Unit;
use crate::types::unit::validate_unit_name;
use std::collections::HashSet;
use std::io;
use std::path::Path;
use tracing::{debug, info};
use walkdir::WalkDir;

/// Immediate subdirectories of `plugins_dir` named with `prefix`, sorted by name.
pub fn discover_units(plugins_dir: &Path, prefix: &str) -> Result<Vec<Unit>> {
    let unreadable = |source: io::Error| Error::UnitSourceUnreadable {
        path: plugins_dir.to_path_buf(),
        source,
    };

    if !plugins_dir.is_dir() {
        return Err(unreadable(io::Error::new(
            io::ErrorKind::NotFound,
            "not a directory",
        )));
    }

    let mut units = Vec::new();
    for entry in WalkDir::new(plugins_dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|e| unreadable(io::Error::from(e)))?;
        if !entry.file_type().is_dir() {
            continue;
        }

        let Some(name) = entry.file_name().to_str() else {
            continue;
        };
        if validate_unit_name(name, prefix).is_ok() {
            units.push(Unit::new(name, entry.path(), prefix)?);
        }
    }

    debug!("Discovered {} unit(s) in {}", units.len(), plugins_dir.display());
    Ok(units)
}

/// Apply the exclusion list, then the inclusion list when it is non-empty.
///
/// Inclusion names are checked against the whole universe, so a unit that is
/// both included and excluded ends up excluded rather than reported missing.
pub fn select_units(
    universe: Vec<Unit>,
    include: &[String],
    exclude: &[String],
    prefix: &str,
) -> Result<Vec<Unit>> {
    for name in include.iter().chain(exclude) {
        validate_unit_name(name, prefix)?;
    }

    let known: HashSet<&str> = universe.iter().map(|unit| unit.name.as_str()).collect();
    if let Some(missing) = include.iter().find(|name| !known.contains(name.as_str())) {
        return Err(Error::UnknownUnit(missing.clone()));
    }

    let selected = universe
        .into_iter()
        .filter(|unit| !exclude.contains(&unit.name))
        .filter(|unit| include.is_empty() || include.contains(&unit.name))
        .collect();
    Ok(selected)
}

/// The units a run over `config` covers. Fails on any configuration error.
pub fn resolve_units(config: &BuildConfig) -> Result<Vec<Unit>> {
    config.validate()?;

    let universe = discover_units(&config.plugins_dir, &config.name_prefix)?;
    let selected = select_units(
        universe,
        &config.include,
        &config.exclude,
        &config.name_prefix,
    )?;
    info!("Selected {} unit(s)", selected.len());
    Ok(selected)
}
