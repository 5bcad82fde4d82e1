//! Loading documentation files from disk.

use std::fs;
use std::path::Path;

use inheritdoc_core::{DocumentationTarget, MemberDocumentationMap, ParseError};

use crate::read::{add_member_documentations, read_documentation, ReadOptions};

/// Raw member documentation gathered from many documentation files.
#[derive(Debug, Clone, Default)]
pub struct LoadedDocumentation {
    pub members: MemberDocumentationMap,
    /// Targets whose documentation file does not exist
    pub missing_files: Vec<DocumentationTarget>,
}

/// Read one documentation file.
pub fn load_documentation_file(
    path: impl AsRef<Path>,
    target: DocumentationTarget,
    options: &ReadOptions,
) -> Result<MemberDocumentationMap, ParseError> {
    let xml = fs::read_to_string(path.as_ref())?;
    read_documentation(&xml, &target, options)
}

/// Read the documentation files of many targets into one raw map.
///
/// A target whose file does not exist is listed in
/// [`LoadedDocumentation::missing_files`] instead of failing the load.
pub fn load_documentation_files<I, P>(files: I, options: &ReadOptions) -> Result<LoadedDocumentation, ParseError>
where
    I: IntoIterator<Item = (DocumentationTarget, P)>,
    P: AsRef<Path>,
{
    let mut loaded = LoadedDocumentation::default();

    for (target, path) in files {
        let path = path.as_ref();
        if !path.exists() {
            tracing::warn!(target_name = %target, path = %path.display(), "documentation file not found");
            loaded.missing_files.push(target);
            continue;
        }

        let xml = fs::read_to_string(path)?;
        add_member_documentations(&xml, &mut loaded.members, &target, options)?;
    }

    Ok(loaded)
}
