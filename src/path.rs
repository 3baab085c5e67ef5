//! Comma-delimited folder paths.
//!
//! A path is `","` for the root or `",seg1,seg2,...,"` for nested folders.
//! Comparison is exact and case-sensitive everywhere. Segments never contain
//! the separator; raw folder names go through [`encode_segment`] first.

pub const SEPARATOR: char = ',';
pub const ROOT: &str = ",";

const ESCAPE: char = '%';

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PathError {
    #[error("path segment cannot be empty")]
    EmptySegment,

    #[error("path segment {0:?} contains the separator")]
    SeparatorInSegment(String),

    #[error("malformed path {0:?}")]
    Malformed(String),
}

/// Appends `segment` to `path`, normalizing the leading and trailing separator.
pub fn append_segment(path: &str, segment: &str) -> Result<String, PathError> {
    if segment.is_empty() {
        return Err(PathError::EmptySegment);
    }
    if segment.contains(SEPARATOR) {
        return Err(PathError::SeparatorInSegment(segment.to_string()));
    }

    let mut out = normalize(path);
    out.push_str(segment);
    out.push(SEPARATOR);
    Ok(out)
}

/// True when `candidate` lies strictly below `parent`.
pub fn is_descendant(parent: &str, candidate: &str) -> bool {
    candidate.len() > parent.len() && candidate.starts_with(parent) && parent.ends_with(SEPARATOR)
}

/// True when `candidate` is `parent` itself or lies below it.
pub fn is_within(parent: &str, candidate: &str) -> bool {
    candidate == parent || is_descendant(parent, candidate)
}

/// The segment directly below `parent` on the way to `candidate`.
pub fn next_segment<'a>(parent: &str, candidate: &'a str) -> Option<&'a str> {
    if !is_descendant(parent, candidate) {
        return None;
    }
    candidate[parent.len()..]
        .split(SEPARATOR)
        .next()
        .filter(|seg| !seg.is_empty())
}

pub fn is_valid(path: &str) -> bool {
    validate(path).is_ok()
}

pub fn validate(path: &str) -> Result<(), PathError> {
    if path == ROOT {
        return Ok(());
    }
    if path.len() < 3 || !path.starts_with(SEPARATOR) || !path.ends_with(SEPARATOR) {
        return Err(PathError::Malformed(path.to_string()));
    }
    if path[1..path.len() - 1].split(SEPARATOR).any(str::is_empty) {
        return Err(PathError::Malformed(path.to_string()));
    }
    Ok(())
}

/// Splits a path into its segments. The root has none.
pub fn segments(path: &str) -> Vec<&str> {
    path.split(SEPARATOR).filter(|seg| !seg.is_empty()).collect()
}

pub fn join<S: AsRef<str>>(segments: &[S]) -> Result<String, PathError> {
    segments
        .iter()
        .try_fold(ROOT.to_string(), |path, seg| append_segment(&path, seg.as_ref()))
}

pub fn depth(path: &str) -> usize {
    segments(path).len()
}

/// Parent path and last segment, or `None` for the root.
pub fn split_last(path: &str) -> Option<(&str, &str)> {
    let trimmed = path.strip_suffix(SEPARATOR)?;
    let idx = trimmed.rfind(SEPARATOR)?;
    let name = &trimmed[idx + 1..];
    if name.is_empty() {
        return None;
    }
    Some((&path[..=idx], name))
}

pub fn parent(path: &str) -> Option<&str> {
    split_last(path).map(|(parent, _)| parent)
}

/// Escapes a raw folder name so it is a valid segment.
pub fn encode_segment(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for c in name.chars() {
        match c {
            ESCAPE => out.push_str("%25"),
            SEPARATOR => out.push_str("%2C"),
            c => out.push(c),
        }
    }
    out
}

/// Reverses [`encode_segment`]. Unknown escapes are kept as-is.
pub fn decode_segment(segment: &str) -> String {
    let mut out = String::with_capacity(segment.len());
    let mut rest = segment;
    while let Some(idx) = rest.find(ESCAPE) {
        out.push_str(&rest[..idx]);
        let tail = &rest[idx..];
        if tail.starts_with("%25") {
            out.push(ESCAPE);
            rest = &tail[3..];
        } else if tail.starts_with("%2C") || tail.starts_with("%2c") {
            out.push(SEPARATOR);
            rest = &tail[3..];
        } else {
            out.push(ESCAPE);
            rest = &tail[1..];
        }
    }
    out.push_str(rest);
    out
}

/// Turns a user-supplied target into a path: `"A"` and `"A,B"` become
/// `",A,"` and `",A,B,"`, a full path is returned unchanged.
pub fn from_target(target: &str) -> Result<String, PathError> {
    let target = target.trim();
    if target.is_empty() || target == ROOT {
        return Ok(ROOT.to_string());
    }
    let path = normalize(target);
    let path = if path.ends_with(SEPARATOR) {
        path
    } else {
        format!("{path}{SEPARATOR}")
    };
    validate(&path)?;
    Ok(path)
}

fn normalize(path: &str) -> String {
    let trimmed = path.trim_matches(SEPARATOR);
    if trimmed.is_empty() {
        ROOT.to_string()
    } else {
        format!("{SEPARATOR}{trimmed}{SEPARATOR}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_normalizes_separators() {
        assert_eq!(append_segment(ROOT, "A").unwrap(), ",A,");
        assert_eq!(append_segment(",A,", "B").unwrap(), ",A,B,");
        assert_eq!(append_segment("A", "B").unwrap(), ",A,B,");
        assert_eq!(append_segment(",A", "B").unwrap(), ",A,B,");
        assert_eq!(append_segment("", "B").unwrap(), ",B,");
    }

    #[test]
    fn append_rejects_bad_segments() {
        assert_eq!(append_segment(ROOT, ""), Err(PathError::EmptySegment));
        assert!(matches!(
            append_segment(ROOT, "a,b"),
            Err(PathError::SeparatorInSegment(_))
        ));
    }

    #[test]
    fn descendant_is_strict_and_case_sensitive() {
        assert!(is_descendant(ROOT, ",A,"));
        assert!(is_descendant(",A,", ",A,B,"));
        assert!(!is_descendant(",A,", ",A,"));
        assert!(!is_descendant(",A,", ",AB,"));
        assert!(!is_descendant(",a,", ",A,B,"));
        assert!(is_within(",A,", ",A,"));
    }

    #[test]
    fn next_segment_walks_one_level() {
        assert_eq!(next_segment(ROOT, ",A,B,"), Some("A"));
        assert_eq!(next_segment(",A,", ",A,B,C,"), Some("B"));
        assert_eq!(next_segment(",A,", ",A,"), None);
        assert_eq!(next_segment(",A,", ",B,"), None);
    }

    #[test]
    fn validate_grammar() {
        assert!(is_valid(","));
        assert!(is_valid(",A,"));
        assert!(is_valid(",A,B C,"));
        assert!(!is_valid(""));
        assert!(!is_valid(",,"));
        assert!(!is_valid("A,"));
        assert!(!is_valid(",A"));
        assert!(!is_valid(",A,,B,"));
    }

    #[test]
    fn split_and_join() {
        assert_eq!(segments(",A,B,"), vec!["A", "B"]);
        assert!(segments(ROOT).is_empty());
        assert_eq!(join(&["A", "B"]).unwrap(), ",A,B,");
        assert_eq!(join::<&str>(&[]).unwrap(), ROOT);
        assert_eq!(split_last(",A,B,"), Some((",A,", "B")));
        assert_eq!(parent(",A,"), Some(ROOT));
        assert_eq!(parent(ROOT), None);
        assert_eq!(depth(",A,B,"), 2);
    }

    #[test]
    fn segment_escaping_is_reversible() {
        let raw = "Work, 100% done";
        let encoded = encode_segment(raw);
        assert_eq!(encoded, "Work%2C 100%25 done");
        assert!(append_segment(ROOT, &encoded).is_ok());
        assert_eq!(decode_segment(&encoded), raw);
        assert_eq!(decode_segment("50%off"), "50%off");
    }

    #[test]
    fn target_to_path() {
        assert_eq!(from_target("Favourites").unwrap(), ",Favourites,");
        assert_eq!(from_target(",A,B,").unwrap(), ",A,B,");
        assert_eq!(from_target("A,B").unwrap(), ",A,B,");
        assert_eq!(from_target("").unwrap(), ROOT);
        assert!(from_target("A,,B").is_err());
    }
}
