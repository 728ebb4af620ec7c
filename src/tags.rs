//! Comma-separated tags inside annotations.
//!
//! Annotations are free text, but datasets usually keep them as a tag list:
//!
//! ```text
//! 1girl, red hair,smile , outdoors
//! ```
//!
//! splits into `["1girl", "red hair", "smile", "outdoors"]`. Tags are trimmed
//! and empty pieces are dropped. Rewritten annotations are joined with a bare
//! `,`.
//!
//! The pure functions here do the string work. [`apply_to_files`] runs one of
//! them over a batch of sidecars and reports per-file outcomes.

use crate::annotation;
use crate::config::DecodeErrors;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Tags shown in the tag panel unless the caller asks for another limit.
pub const DEFAULT_TAG_LIMIT: usize = 10;

/// Where [`add_tag`] puts the new tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Position {
    Start,
    #[default]
    End,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagCount {
    pub tag: String,
    pub count: usize,
}

/// Trimmed, non-empty tags in order of appearance.
pub fn split_tags(annotation: &str) -> impl Iterator<Item = &str> {
    annotation.split(',').map(str::trim).filter(|t| !t.is_empty())
}

/// Count every tag across `annotations`, most frequent first.
///
/// Ties keep first-seen order. A tag repeated inside one annotation counts
/// each time. At most `limit` tags are returned.
pub fn tag_counts<'a, I>(annotations: I, limit: usize) -> Vec<TagCount>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut counts: Vec<TagCount> = Vec::new();

    for annotation in annotations {
        for tag in split_tags(annotation) {
            match index.get(tag) {
                Some(&i) => counts[i].count += 1,
                None => {
                    index.insert(tag, counts.len());
                    counts.push(TagCount {
                        tag: tag.to_string(),
                        count: 1,
                    });
                }
            }
        }
    }

    // stable sort keeps first-seen order among equal counts
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts.truncate(limit);
    counts
}

/// Drop every occurrence of `tag`. Empty pieces go as well.
pub fn remove_tag(annotation: &str, tag: &str) -> String {
    let tag = tag.trim();
    split_tags(annotation)
        .filter(|t| *t != tag)
        .collect::<Vec<_>>()
        .join(",")
}

/// Put `tag` at the start or end of the annotation.
///
/// The existing text is trimmed but otherwise kept as is. An empty
/// annotation becomes just `tag`.
pub fn add_tag(annotation: &str, tag: &str, position: Position) -> String {
    let current = annotation.trim();
    let tag = tag.trim();
    if current.is_empty() {
        return tag.to_string();
    }
    match position {
        Position::Start => format!("{tag},{current}"),
        Position::End => format!("{current},{tag}"),
    }
}

/// New content for one sidecar after a batch edit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpdatedAnnotation {
    pub txt_path: String,
    pub annotation: String,
}

/// A sidecar the batch edit could not read or write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedAnnotation {
    pub txt_path: String,
    pub error: String,
}

#[derive(Debug, Default, Serialize)]
pub struct BatchReport {
    pub updated: Vec<UpdatedAnnotation>,
    pub failed: Vec<FailedAnnotation>,
}

/// Rewrite each sidecar in `txt_paths` with `edit`.
///
/// `resolve` maps a caller-supplied path to the file to open. Files whose
/// content does not change are reported as updated but not rewritten. A
/// failure on one file is recorded and the rest still run.
pub fn apply_to_files<R, F>(
    txt_paths: &[String],
    policy: DecodeErrors,
    resolve: R,
    edit: F,
) -> BatchReport
where
    R: Fn(&str) -> std::path::PathBuf,
    F: Fn(&str) -> String,
{
    let mut report = BatchReport::default();

    for txt_path in txt_paths {
        match rewrite(&resolve(txt_path), policy, &edit) {
            Ok(annotation) => report.updated.push(UpdatedAnnotation {
                txt_path: txt_path.clone(),
                annotation,
            }),
            Err(err) => {
                tracing::warn!(txt_path = %txt_path, error = %err, "batch tag edit failed");
                report.failed.push(FailedAnnotation {
                    txt_path: txt_path.clone(),
                    error: err.to_string(),
                });
            }
        }
    }

    report
}

fn rewrite<F>(
    path: &Path,
    policy: DecodeErrors,
    edit: &F,
) -> Result<String, annotation::AnnotationError>
where
    F: Fn(&str) -> String,
{
    let current = annotation::read_annotation(path, policy)?;
    let next = edit(&current);
    if next != current {
        annotation::write_annotation(path, &next)?;
    }
    Ok(next)
}
