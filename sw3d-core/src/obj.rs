/// Wavefront OBJ reader for vertex positions and triangular faces
use std::path::{Path, PathBuf};

use log::{debug, trace};
use nom::{
    bytes::complete::{tag, take_till},
    character::complete::{char, digit1, space0, space1},
    combinator::{all_consuming, map_res, opt},
    multi::many1,
    number::complete::float,
    sequence::{preceded, tuple},
    IResult,
};
use thiserror::Error;

use crate::geometry::{Mesh, Triangle};
use crate::math::{point, Vec4};

#[derive(Debug, Error)]
pub enum ObjError {
    #[error("line {line}: malformed `{keyword}` statement: {text:?}")]
    Syntax {
        line: usize,
        keyword: &'static str,
        text: String,
    },
    #[error("line {line}: face has {count} vertices, only triangles are supported")]
    FaceArity { line: usize, count: usize },
    #[error("line {line}: face refers to vertex {index}, but {available} vertices are defined so far")]
    IndexOutOfRange {
        line: usize,
        index: usize,
        available: usize,
    },
    #[error("failed to read {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// `v x y z [w]`; a trailing `w` is accepted and ignored.
fn vertex(input: &str) -> IResult<&str, Vec4> {
    let (input, _) = tag("v")(input)?;
    let (input, (x, y, z)) = tuple((
        preceded(space1, float),
        preceded(space1, float),
        preceded(space1, float),
    ))(input)?;
    let (input, _) = opt(preceded(space1, float))(input)?;
    let (input, _) = space0(input)?;
    Ok((input, point(x, y, z)))
}

/// A 1-based position index, with any `/texture/normal` suffix dropped.
fn face_index(input: &str) -> IResult<&str, usize> {
    let (input, index) = map_res(digit1, |digits: &str| digits.parse::<usize>())(input)?;
    let (input, _) = opt(preceded(char('/'), take_till(char::is_whitespace)))(input)?;
    Ok((input, index))
}

fn face(input: &str) -> IResult<&str, Vec<usize>> {
    let (input, _) = tag("f")(input)?;
    let (input, indices) = many1(preceded(space1, face_index))(input)?;
    let (input, _) = space0(input)?;
    Ok((input, indices))
}

/// Parse OBJ text into a mesh of [`crate::geometry::DEFAULT_COLOR`] triangles.
///
/// Only `v` and `f` statements are read. Blank lines, `#` comments and every
/// other statement are skipped. Faces must have exactly three vertices and
/// may only refer to vertices defined above them.
pub fn parse_obj(text: &str) -> Result<Mesh, ObjError> {
    let mut vertices: Vec<Vec4> = Vec::new();
    let mut mesh = Mesh::new();

    for (number, raw) in text.lines().enumerate() {
        let line = number + 1;
        let statement = raw.trim();
        let syntax = |keyword| ObjError::Syntax {
            line,
            keyword,
            text: statement.to_string(),
        };

        match statement.split_whitespace().next() {
            None => {}
            Some(keyword) if keyword.starts_with('#') => {}
            Some("v") => {
                let (_, position) = all_consuming(vertex)(statement).map_err(|_| syntax("v"))?;
                vertices.push(position);
            }
            Some("f") => {
                let (_, indices) = all_consuming(face)(statement).map_err(|_| syntax("f"))?;
                let [a, b, c] = indices[..] else {
                    return Err(ObjError::FaceArity {
                        line,
                        count: indices.len(),
                    });
                };

                let lookup = |index: usize| {
                    index
                        .checked_sub(1)
                        .and_then(|i| vertices.get(i))
                        .copied()
                        .ok_or(ObjError::IndexOutOfRange {
                            line,
                            index,
                            available: vertices.len(),
                        })
                };
                mesh.add_triangle(Triangle::new(lookup(a)?, lookup(b)?, lookup(c)?));
            }
            Some(other) => trace!("line {line}: skipping `{other}` statement"),
        }
    }

    debug!(
        "parsed OBJ: {} vertices, {} triangles",
        vertices.len(),
        mesh.len()
    );
    Ok(mesh)
}

/// Read and parse the OBJ file at `path`.
pub fn load_obj(path: impl AsRef<Path>) -> Result<Mesh, ObjError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|source| ObjError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    debug!("loading {}", path.display());
    parse_obj(&text)
}
