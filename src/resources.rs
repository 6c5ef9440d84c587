// ABOUTME: Declared infrastructure resources keyed by logical id.
// ABOUTME: Registers the deploy principal without overwriting caller-declared entries.

use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};

use crate::types::{BucketName, Principal};

/// Logical id of the IAM user deploy credentials are issued for.
pub const USER_LOGICAL_ID: &str = "RemotionUser";

/// Logical id of the optional inline policy attached to that user.
pub const POLICY_LOGICAL_ID: &str = "RemotionUserPolicy";

/// An ordered collection of resource declarations owned by the caller.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceSet(Mapping);

/// What `ResourceSet::register` did with each offered resource.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Registration {
    pub added: Vec<String>,
    pub kept: Vec<String>,
}

impl ResourceSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, logical_id: &str) -> Option<&Value> {
        self.0.get(logical_id)
    }

    pub fn contains(&self, logical_id: &str) -> bool {
        self.0.contains_key(logical_id)
    }

    pub fn insert(&mut self, logical_id: &str, resource: Value) -> Option<Value> {
        self.0.insert(Value::String(logical_id.to_string()), resource)
    }

    pub fn logical_ids(&self) -> impl Iterator<Item = &str> {
        self.0.keys().filter_map(Value::as_str)
    }

    /// Add every resource of `offered` whose logical id is not taken yet.
    pub fn register(&mut self, offered: ResourceSet) -> Registration {
        let mut registration = Registration::default();

        for (key, resource) in offered.0 {
            let Some(logical_id) = key.as_str().map(str::to_string) else {
                continue;
            };

            if self.0.contains_key(&key) {
                tracing::debug!("Keeping caller-declared resource {}", logical_id);
                registration.kept.push(logical_id);
            } else {
                self.0.insert(key, resource);
                registration.added.push(logical_id);
            }
        }

        registration
    }

    /// `Properties.BucketName` of the resource declared as `logical_id`.
    pub fn bucket_name(&self, logical_id: &str) -> Option<BucketName> {
        self.get(logical_id)?
            .get("Properties")?
            .get("BucketName")?
            .as_str()
            .map(BucketName::new)
    }

    /// `Properties.UserName` of the declared deploy user, if any.
    pub fn declared_user_name(&self) -> Option<&str> {
        self.get(USER_LOGICAL_ID)?
            .get("Properties")?
            .get("UserName")?
            .as_str()
    }

    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }
}

/// Resources this tool contributes: the deploy user and, when a policy
/// document is supplied, an inline policy attached to it.
pub fn principal_resources(principal: &Principal, policy_document: Option<&Value>) -> ResourceSet {
    let mut set = ResourceSet::new();

    set.insert(
        USER_LOGICAL_ID,
        mapping([
            ("Type", Value::from("AWS::IAM::User")),
            (
                "Properties",
                mapping([("UserName", Value::from(principal.as_str()))]),
            ),
        ]),
    );

    if let Some(document) = policy_document {
        set.insert(
            POLICY_LOGICAL_ID,
            mapping([
                ("Type", Value::from("AWS::IAM::Policy")),
                (
                    "Properties",
                    mapping([
                        ("PolicyName", Value::from(format!("{principal}-policy"))),
                        ("PolicyDocument", document.clone()),
                        (
                            "Users",
                            Value::Sequence(vec![mapping([(
                                "Ref",
                                Value::from(USER_LOGICAL_ID),
                            )])]),
                        ),
                    ]),
                ),
            ]),
        );
    }

    set
}

fn mapping<const N: usize>(entries: [(&str, Value); N]) -> Value {
    Value::Mapping(
        entries
            .into_iter()
            .map(|(k, v)| (Value::from(k), v))
            .collect(),
    )
}
