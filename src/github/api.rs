use serde::{Deserialize, Serialize};

pub const CONTAINER_PACKAGE_TYPE: &str = "container";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct PackageVersion {
    pub id: u64,
    pub name: String,
    pub metadata: PackageVersionMetadata,
}

impl PackageVersion {
    pub fn is_container(&self) -> bool {
        self.metadata.package_type == CONTAINER_PACKAGE_TYPE
    }

    pub fn tags(&self) -> &[String] {
        &self.metadata.container.tags
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct PackageVersionMetadata {
    pub package_type: String,
    // Only present for container packages.
    #[serde(default)]
    pub container: ContainerVersionMetadata,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct ContainerVersionMetadata {
    pub tags: Vec<String>,
}
