//! Parallel batch expansion.

use inheritdoc_core::{ExpandError, MemberDocumentation, MemberDocumentationMap, MissingDocumentationReference};
use rayon::prelude::*;

use crate::expander::{ExpandOutput, InheritdocExpander};
use crate::options::ExpandOptions;

/// Expand every member of a raw map across the rayon thread pool.
///
/// Produces the same output as [`crate::expand_all`]: members and missing
/// references are merged in input order.
pub fn expand_all_parallel(members: &MemberDocumentationMap) -> Result<ExpandOutput, ExpandError> {
    expand_all_parallel_with(members, &ExpandOptions::default())
}

pub fn expand_all_parallel_with(
    members: &MemberDocumentationMap,
    options: &ExpandOptions,
) -> Result<ExpandOutput, ExpandError> {
    let raw: Vec<&MemberDocumentation> = members.values().collect();

    let expanded: Vec<(MemberDocumentation, Vec<MissingDocumentationReference>)> = raw
        .into_par_iter()
        .map(|member| {
            let mut expander = InheritdocExpander::new(members, options);
            let expanded = expander.expand_member(member)?;
            Ok((expanded, expander.into_missing()))
        })
        .collect::<Result<_, ExpandError>>()?;

    let mut output = ExpandOutput::default();
    for (member, missing) in expanded {
        output.members.insert(member);
        output.missing.extend(missing);
    }
    Ok(output)
}
