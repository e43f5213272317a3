// ──────────────────────────────────────────────────────────────────────────
// level/parse.rs
//
//  *   text   [sectors] / [walls]   ──►  world::Level
//
//  [sectors]  id start_wall num_walls floor ceiling
//  [walls]    x0 y0 x1 y1 portal          (portal = -1 → solid)
// ──────────────────────────────────────────────────────────────────────────

use std::{fs, io, path::Path, path::PathBuf, str::FromStr};

use glam::vec2;
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

use crate::world::{Level, MAX_SECTORS, MAX_WALLS, Sector, SectorId, Wall, WallId};

/*=======================================================================*/
/*                                Errors                                 */
/*=======================================================================*/

#[derive(Debug, Error)]
pub enum LevelError {
    #[error("cannot read level `{}`: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("line {line}: unknown section `[{name}]`")]
    UnknownSection { line: usize, name: String },

    #[error("line {line}: data before any `[sectors]` or `[walls]` header")]
    NoSection { line: usize },

    #[error("line {line}: expected {expected} fields, found {found}")]
    FieldCount {
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error("line {line}: cannot parse `{token}` as a number")]
    BadNumber { line: usize, token: String },

    #[error("too many {what} (limit {max})")]
    TooMany { what: &'static str, max: usize },

    #[error("level has no sectors")]
    Empty,

    #[error("sector {sector}: walls {first}..{end} out of range ({walls} walls)")]
    BadSlice {
        sector: usize,
        first: usize,
        end: usize,
        walls: usize,
    },

    #[error("wall {wall}: portal to sector {portal} out of range ({sectors} sectors)")]
    BadPortal {
        wall: usize,
        portal: i64,
        sectors: usize,
    },
}

/*=======================================================================*/
/*                              Public API                               */
/*=======================================================================*/

/// Read and parse the level file at `path`.
pub fn load_level<P: AsRef<Path>>(path: P) -> Result<Level, LevelError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| LevelError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let name = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    parse_level(name, &text)
}

#[derive(Clone, Copy)]
enum Section {
    Sectors,
    Walls,
}

/// Parse level text. Line order defines wall indices.
///
/// Slice bounds and portal indices are checked so that later indexing
/// cannot go out of range; winding and convexity are the author's job.
pub fn parse_level<S: Into<String>>(name: S, text: &str) -> Result<Level, LevelError> {
    static HEADER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\[\s*(\w+)\s*\]$").unwrap());

    let mut section = None;
    let mut sectors = Vec::new();
    let mut walls = Vec::new();
    // raw portal values, resolved once the sector count is known
    let mut portals = Vec::new();

    for (idx, raw) in text.lines().enumerate() {
        let line = idx + 1;
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        if let Some(caps) = HEADER.captures(trimmed) {
            section = Some(match &caps[1] {
                "sectors" => Section::Sectors,
                "walls" => Section::Walls,
                other => {
                    return Err(LevelError::UnknownSection {
                        line,
                        name: other.to_string(),
                    });
                }
            });
            continue;
        }

        let fields: Vec<&str> = trimmed.split_whitespace().collect();
        match section.ok_or(LevelError::NoSection { line })? {
            Section::Sectors => {
                expect_fields(line, &fields, 5)?;
                if sectors.len() == MAX_SECTORS {
                    return Err(LevelError::TooMany {
                        what: "sectors",
                        max: MAX_SECTORS,
                    });
                }
                sectors.push(RawSector {
                    id: number(line, fields[0])?,
                    first_wall: number(line, fields[1])?,
                    num_walls: number(line, fields[2])?,
                    floor_h: number(line, fields[3])?,
                    ceil_h: number(line, fields[4])?,
                });
            }
            Section::Walls => {
                expect_fields(line, &fields, 5)?;
                if walls.len() == MAX_WALLS {
                    return Err(LevelError::TooMany {
                        what: "walls",
                        max: MAX_WALLS,
                    });
                }
                walls.push(Wall {
                    p0: vec2(number(line, fields[0])?, number(line, fields[1])?),
                    p1: vec2(number(line, fields[2])?, number(line, fields[3])?),
                    portal: None,
                });
                portals.push(number::<i64>(line, fields[4])?);
            }
        }
    }

    if sectors.is_empty() {
        return Err(LevelError::Empty);
    }

    for (i, (wall, &portal)) in walls.iter_mut().zip(&portals).enumerate() {
        wall.portal = match portal {
            p if p < 0 => None,
            p if (p as usize) < sectors.len() => Some(p as SectorId),
            p => {
                return Err(LevelError::BadPortal {
                    wall: i,
                    portal: p,
                    sectors: sectors.len(),
                });
            }
        };
    }

    let sectors = sectors
        .into_iter()
        .enumerate()
        .map(|(i, s)| s.resolve(i, walls.len()))
        .collect::<Result<Vec<_>, _>>()?;

    let name = name.into();
    debug!(
        "level `{name}`: {} sectors, {} walls",
        sectors.len(),
        walls.len()
    );

    Ok(Level {
        name,
        sectors,
        walls,
    })
}

/*=======================================================================*/
/*                               Helpers                                 */
/*=======================================================================*/

struct RawSector {
    id: i32,
    first_wall: usize,
    num_walls: usize,
    floor_h: f32,
    ceil_h: f32,
}

impl RawSector {
    fn resolve(self, idx: usize, wall_count: usize) -> Result<Sector, LevelError> {
        let in_range = self
            .first_wall
            .checked_add(self.num_walls)
            .is_some_and(|end| end <= wall_count);
        if !in_range {
            return Err(LevelError::BadSlice {
                sector: idx,
                first: self.first_wall,
                end: self.first_wall.saturating_add(self.num_walls),
                walls: wall_count,
            });
        }
        // end <= wall_count <= MAX_WALLS, so the casts below are lossless
        Ok(Sector {
            id: self.id,
            first_wall: self.first_wall as WallId,
            num_walls: self.num_walls as u16,
            floor_h: self.floor_h,
            ceil_h: self.ceil_h,
        })
    }
}

fn expect_fields(line: usize, fields: &[&str], expected: usize) -> Result<(), LevelError> {
    if fields.len() != expected {
        return Err(LevelError::FieldCount {
            line,
            expected,
            found: fields.len(),
        });
    }
    Ok(())
}

fn number<T: FromStr>(line: usize, token: &str) -> Result<T, LevelError> {
    token.parse().map_err(|_| LevelError::BadNumber {
        line,
        token: token.to_string(),
    })
}

/*=======================================================================*/
/*                                Tests                                  */
/*=======================================================================*/
