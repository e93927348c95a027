//! Translation of resource URLs into local relative paths

use std::borrow::Cow;
use std::path::{Component, Path, PathBuf};

/// Extension appended to resources whose name carries no usable extension
pub const DEFAULT_EXTENSION: &str = ".pdf";

/// Maps a resource URL onto a path relative to the download root
///
/// 1. The first occurrence of `media_base` is stripped from `resource_url`.
/// 2. The remainder is percent-decoded; undecodable input is kept as is.
/// 3. With a non-empty `folder_filter`, identifiers not containing it are
///    rejected.
/// 4. A missing extension, or one containing a space, gets `.pdf` appended.
///
/// Root, `.` and `..` components are dropped so the result always stays
/// below the download root.
///
/// # Examples
///
/// ```
/// use extranet_harvester::output::map_to_path;
/// use std::path::Path;
///
/// let base = "https://site/media/web/site/media/";
/// let path = map_to_path(&format!("{base}Sitzungen/Report%202023"), base, "").unwrap();
/// assert_eq!(path, Path::new("Sitzungen/Report 2023.pdf"));
/// ```
pub fn map_to_path(resource_url: &str, media_base: &str, folder_filter: &str) -> Option<PathBuf> {
    let identifier = strip_media_base(resource_url, media_base);
    let decoded = decode_identifier(&identifier);

    if !folder_filter.is_empty() && !decoded.contains(folder_filter) {
        return None;
    }

    let mut relpath = decoded.into_owned();
    let extension = trailing_extension(&relpath);
    if extension.is_empty() || extension.contains(' ') {
        relpath.push_str(DEFAULT_EXTENSION);
    }

    let path = confine(Path::new(&relpath));
    if path.as_os_str().is_empty() {
        None
    } else {
        Some(path)
    }
}

fn strip_media_base<'a>(resource_url: &'a str, media_base: &str) -> Cow<'a, str> {
    if media_base.is_empty() {
        return Cow::Borrowed(resource_url);
    }
    match resource_url.strip_prefix(media_base) {
        Some(rest) => Cow::Borrowed(rest),
        None => Cow::Owned(resource_url.replacen(media_base, "", 1)),
    }
}

fn decode_identifier(identifier: &str) -> Cow<'_, str> {
    match urlencoding::decode(identifier) {
        Ok(decoded) => Cow::Owned(decoded.into_owned()),
        Err(_) => Cow::Borrowed(identifier),
    }
}

/// Returns the extension of the last path element, including its dot
///
/// Everything after the final `.` of the last element counts, so
/// `"Sitzung vom 29. Juni"` yields `". Juni"`.
fn trailing_extension(path: &str) -> &str {
    let name = path.rsplit('/').next().unwrap_or(path);
    match name.rfind('.') {
        Some(index) => &name[index..],
        None => "",
    }
}

fn confine(path: &Path) -> PathBuf {
    path.components()
        .filter_map(|component| match component {
            Component::Normal(part) => Some(part),
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://extranet.example.ch/media/web/extranet.example.ch/media/";

    fn map(rest: &str, filter: &str) -> Option<PathBuf> {
        map_to_path(&format!("{}{}", BASE, rest), BASE, filter)
    }

    #[test]
    fn test_missing_extension_gets_pdf() {
        assert_eq!(map("Sitzungen/Report", ""), Some(PathBuf::from("Sitzungen/Report.pdf")));
    }

    #[test]
    fn test_real_extension_is_kept() {
        assert_eq!(
            map("Sitzungen/Report.docx", ""),
            Some(PathBuf::from("Sitzungen/Report.docx"))
        );
    }

    #[test]
    fn test_extension_with_space_gets_pdf() {
        assert_eq!(
            map("Weird%20File.%20Name", ""),
            Some(PathBuf::from("Weird File. Name.pdf"))
        );
        assert_eq!(
            map("Bau/Tischvorlage%20vom%2029.%20Juni", ""),
            Some(PathBuf::from("Bau/Tischvorlage vom 29. Juni.pdf"))
        );
    }

    #[test]
    fn test_dot_in_folder_name_is_not_an_extension() {
        assert_eq!(
            map("Budget%202023.v2/Plan", ""),
            Some(PathBuf::from("Budget 2023.v2/Plan.pdf"))
        );
    }

    #[test]
    fn test_percent_decoding() {
        assert_eq!(
            map("Sitzungen/Report%202023", ""),
            Some(PathBuf::from("Sitzungen/Report 2023.pdf"))
        );
        assert_eq!(
            map("Gr%C3%BCsse/%C3%9Cbersicht.xlsx", ""),
            Some(PathBuf::from("Grüsse/Übersicht.xlsx"))
        );
    }

    #[test]
    fn test_undecodable_identifier_is_kept() {
        // %FF is not valid UTF-8 once decoded
        assert_eq!(map("Archiv/Bad%FFName", ""), Some(PathBuf::from("Archiv/Bad%FFName.pdf")));
    }

    #[test]
    fn test_plus_is_not_a_space() {
        assert_eq!(map("A+B.txt", ""), Some(PathBuf::from("A+B.txt")));
    }

    #[test]
    fn test_filter_rejects_non_matching() {
        assert_eq!(map("Budget/Plan.xlsx", "Sitzungen"), None);
    }

    #[test]
    fn test_filter_matches_decoded_substring() {
        assert_eq!(
            map("Sitzung%20vom%202023_01_12/Protokoll.pdf", "vom 2023"),
            Some(PathBuf::from("Sitzung vom 2023_01_12/Protokoll.pdf"))
        );
    }

    #[test]
    fn test_filter_is_substring_not_path_boundary() {
        assert!(map("Sitzungen_alt/Plan.pdf", "Sitzungen").is_some());
        assert!(map("Archiv/Sitzungen.pdf", "Sitzungen").is_some());
    }

    #[test]
    fn test_empty_filter_accepts_everything() {
        for rest in ["a", "b/c.doc", "Sitzungen/x y", "%41"] {
            assert!(map(rest, "").is_some(), "{} should pass", rest);
        }
    }

    #[test]
    fn test_mapping_is_deterministic() {
        let first = map("Sitzungen/Report%202023", "Sitz");
        let second = map("Sitzungen/Report%202023", "Sitz");
        assert_eq!(first, second);
    }

    #[test]
    fn test_only_first_occurrence_of_base_is_stripped() {
        let url = format!("{}nested/{}file.txt", BASE, BASE);
        let path = map_to_path(&url, BASE, "").unwrap();
        assert!(path.starts_with("nested/https:"));
        assert!(path.ends_with("media/file.txt"));
    }

    #[test]
    fn test_parent_components_are_dropped() {
        assert_eq!(
            map("..%2F..%2Fetc/passwd.txt", ""),
            Some(PathBuf::from("etc/passwd.txt"))
        );
    }

    #[test]
    fn test_leading_slash_is_dropped() {
        let base = BASE.trim_end_matches('/');
        let path = map_to_path(&format!("{}/Sitzungen/Report", base), base, "").unwrap();
        assert_eq!(path, PathBuf::from("Sitzungen/Report.pdf"));
    }

    #[test]
    fn test_trailing_extension() {
        assert_eq!(trailing_extension("a/b.pdf"), ".pdf");
        assert_eq!(trailing_extension("a.b/c"), "");
        assert_eq!(trailing_extension("x"), "");
        assert_eq!(trailing_extension("Sitzung vom 29. Juni"), ". Juni");
    }
}
