/// One imported package and the qualifier chosen for it.
///
/// The qualifier is the declared short name until a collision forces an
/// alias; an alias, once set, is never cleared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Package {
    path: String,
    name: String,
    alias: Option<String>,
}

impl Package {
    pub(crate) fn new(path: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
            alias: None,
        }
    }

    /// Full import path, vendor prefix already stripped.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Short name the package declares for itself.
    pub fn declared_name(&self) -> &str {
        &self.name
    }

    /// The token used to prefix referenced type names in generated code.
    pub fn qualifier(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.name)
    }

    pub(crate) fn set_alias(&mut self, alias: String) {
        self.alias = Some(alias);
    }

    /// Candidate qualifier built from the `lvl + 1` trailing path segments.
    ///
    /// Because full import paths are unique, walking enough segments always
    /// produces a distinct candidate unless sanitization collapses two paths
    /// into the same token; the registry falls back to integer suffixes for
    /// that case.
    pub(crate) fn unique_name(&self, lvl: usize) -> String {
        unique_name_for_path(&self.path, lvl)
    }
}

pub(crate) fn unique_name_for_path(path: &str, lvl: usize) -> String {
    let segments: Vec<&str> = path.split('/').collect();
    let take = (lvl + 1).min(segments.len());
    segments[segments.len() - take..]
        .iter()
        .map(|segment| sanitize_segment(segment))
        .collect()
}

fn sanitize_segment(segment: &str) -> String {
    segment
        .replace("go-", "")
        .replace("-go", "")
        .chars()
        .filter(|c| !matches!(c, '-' | '_' | '.' | '@' | '+' | '~'))
        .collect::<String>()
        .to_ascii_lowercase()
}

/// Discard everything up to and including the last `vendor/` path segment.
/// Vendored copies of a package share the identity of the un-vendored one.
pub(crate) fn strip_vendor_path(path: &str) -> &str {
    if let Some(idx) = path.rfind("/vendor/") {
        return &path[idx + "/vendor/".len()..];
    }
    path.strip_prefix("vendor/").unwrap_or(path)
}
