//! User hierarchy group adapter

use crate::client::model::{
    CreateUserHierarchyGroupRequest, HierarchyGroup, HierarchyGroupSummary,
};
use crate::resources::{HierarchyGroupAttributes, HierarchyGroupSpec, HierarchyLevel};
use crate::tags::{TagViews, Tags};

/// Build the CreateUserHierarchyGroup request
pub fn build_create_hierarchy_group_request(
    spec: &HierarchyGroupSpec,
    tags: Option<Tags>,
) -> CreateUserHierarchyGroupRequest {
    CreateUserHierarchyGroupRequest {
        instance_id: spec.instance_id.clone(),
        name: spec.name.clone(),
        parent_group_id: spec.parent().map(str::to_string),
        tags,
    }
}

/// Flatten a DescribeUserHierarchyGroup payload
pub fn flatten_hierarchy_group(
    instance_id: &str,
    hierarchy_group_id: &str,
    group: HierarchyGroup,
    tag_views: TagViews,
) -> HierarchyGroupAttributes {
    let hierarchy_group_id = group
        .id
        .unwrap_or_else(|| hierarchy_group_id.to_string());
    let parent_group_id = parent_in_path(&group.hierarchy_path, &hierarchy_group_id);

    HierarchyGroupAttributes {
        arn: group.arn.unwrap_or_default(),
        instance_id: instance_id.to_string(),
        name: group.name.unwrap_or_default(),
        level_id: group.level_id,
        parent_group_id,
        hierarchy_path: group.hierarchy_path.iter().map(flatten_level).collect(),
        tags: tag_views.tags,
        tags_all: tag_views.tags_all,
        hierarchy_group_id,
    }
}

/// The entry just above `group_id` in a root-first path
pub fn parent_in_path(path: &[HierarchyGroupSummary], group_id: &str) -> Option<String> {
    let position = path
        .iter()
        .position(|level| level.id.as_deref() == Some(group_id))?;

    position
        .checked_sub(1)
        .and_then(|parent| path[parent].id.clone())
}

fn flatten_level(level: &HierarchyGroupSummary) -> HierarchyLevel {
    HierarchyLevel {
        id: level.id.clone(),
        name: level.name.clone(),
        arn: level.arn.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn level(id: &str) -> HierarchyGroupSummary {
        HierarchyGroupSummary {
            id: Some(id.to_string()),
            name: Some(id.to_uppercase()),
            arn: None,
        }
    }

    #[test]
    fn test_empty_parent_is_not_sent() {
        let spec = HierarchyGroupSpec {
            instance_id: "i-1".to_string(),
            name: "Sales".to_string(),
            parent_group_id: Some(String::new()),
            tags: Tags::new(),
        };

        let request = build_create_hierarchy_group_request(&spec, None);
        assert!(request.parent_group_id.is_none());
    }

    #[test]
    fn test_parent_derived_from_path() {
        let path = vec![level("root"), level("mid"), level("leaf")];

        assert_eq!(parent_in_path(&path, "leaf").as_deref(), Some("mid"));
        assert_eq!(parent_in_path(&path, "mid").as_deref(), Some("root"));
        assert_eq!(parent_in_path(&path, "root"), None);
        assert_eq!(parent_in_path(&path, "elsewhere"), None);
    }

    #[test]
    fn test_flatten_group() {
        let group = HierarchyGroup {
            id: Some("leaf".to_string()),
            arn: Some("arn:leaf".to_string()),
            name: Some("Leaf".to_string()),
            level_id: Some("2".to_string()),
            hierarchy_path: vec![level("root"), level("leaf")],
            tags: Tags::new(),
        };

        let attrs = flatten_hierarchy_group("i-1", "leaf", group, TagViews::default());
        assert_eq!(attrs.parent_group_id.as_deref(), Some("root"));
        assert_eq!(attrs.hierarchy_path.len(), 2);
        assert_eq!(attrs.level_id.as_deref(), Some("2"));
    }
}
