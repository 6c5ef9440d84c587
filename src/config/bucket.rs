// ABOUTME: Site bucket setting: an explicit name or a reference to a declared resource.
// ABOUTME: Accepts `bucketName: my-bucket` and `bucketName: { Ref: LogicalId }`.

use serde::Deserialize;

use crate::types::BucketName;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum BucketSource {
    /// Used verbatim in every region.
    Explicit(BucketName),
    /// Resolved at deploy time against the declared infrastructure resources.
    Reference {
        #[serde(rename = "Ref")]
        logical_id: String,
    },
}
