//! copies a directive prefix from the first alternative of a string table entry onto the rest
//!
//! `pre🐬d1||d2||d3` becomes `pre🐬d1||pre🐬d2||pre🐬d3`, so an author only writes the
//! directive once for a line with random alternatives.

use std::collections::HashMap;

use bevy::prelude::*;
use serde::Deserialize;

use crate::{
    directive::{PRIMARY_MARKER, find_primary_marker},
    settings::PortraitSettings,
};

/// Separates alternative texts inside one string table entry.
pub const ALTERNATIVE_SEPARATOR: &str = "||";

/// Key to text table, loaded from `*.strings.ron`.
#[derive(Asset, TypePath, Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct StringTable {
    pub entries: HashMap<String, String>,
}

/// Returns the rewritten value, or `None` when nothing needs to change.
///
/// Alternatives already starting with the prefix are skipped, so running this twice changes
/// nothing the second time.
pub fn propagate_prefix(value: &str) -> Option<String> {
    let marker = find_primary_marker(value)?;
    let head_end = marker + PRIMARY_MARKER.len();
    // a separator in front of the marker means the directive belongs to a later alternative
    let prefix_start = value[..marker]
        .rfind(ALTERNATIVE_SEPARATOR)
        .map_or(0, |index| index + ALTERNATIVE_SEPARATOR.len());
    if value[prefix_start..marker].chars().count() <= 1 {
        return None;
    }
    let prefix = &value[prefix_start..head_end];

    let mut alternatives = value[head_end..].split(ALTERNATIVE_SEPARATOR);
    let mut out = String::with_capacity(value.len() * 2);
    out.push_str(&value[..head_end]);
    out.push_str(alternatives.next().unwrap_or_default());

    let mut changed = false;
    for alternative in alternatives {
        out.push_str(ALTERNATIVE_SEPARATOR);
        if !alternative.starts_with(prefix) {
            out.push_str(prefix);
            changed = true;
        }
        out.push_str(alternative);
    }

    changed.then_some(out)
}

/// Rewrites every entry of `table` in place. Returns how many entries changed.
pub fn propagate_table(table: &mut StringTable) -> usize {
    let mut changed = 0;
    for value in table.entries.values_mut() {
        if let Some(rewritten) = propagate_prefix(value) {
            *value = rewritten;
            changed += 1;
        }
    }
    changed
}

pub(crate) fn propagate_string_tables(
    mut events: MessageReader<AssetEvent<StringTable>>,
    mut tables: ResMut<Assets<StringTable>>,
    asset_server: Res<AssetServer>,
    settings: Res<PortraitSettings>,
) {
    for event in events.read() {
        let (AssetEvent::Added { id } | AssetEvent::Modified { id }) = event else {
            continue;
        };
        let path = asset_server
            .get_path(*id)
            .map(|path| path.path().to_string_lossy().into_owned())
            .unwrap_or_default();
        if !settings.wants_string_table(&path) {
            continue;
        }

        // only take the table mutably when something changes, or the Modified event would loop
        let needs_rewrite = tables.get(*id).is_some_and(|table| {
            table
                .entries
                .values()
                .any(|value| propagate_prefix(value).is_some())
        });
        if !needs_rewrite {
            continue;
        }
        if let Some(mut table) = tables.get_mut(*id) {
            let changed = propagate_table(&mut table);
            debug!("propagated portrait directives in {changed} entries of '{path}'");
        }
    }
}
