use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 권한 (API 키에 부여 가능한 기능)
/// Capability a credential may carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Permission {
    Deposit,
    Transfer,
    Read,
}

impl Permission {
    pub const ALL: [Permission; 3] = [Permission::Deposit, Permission::Transfer, Permission::Read];

    pub fn as_str(&self) -> &'static str {
        match self {
            Permission::Deposit => "deposit",
            Permission::Transfer => "transfer",
            Permission::Read => "read",
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Permission {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "deposit" => Ok(Permission::Deposit),
            "transfer" => Ok(Permission::Transfer),
            "read" => Ok(Permission::Read),
            other => Err(format!("Unknown permission: {}", other)),
        }
    }
}

/// 권한 집합 (중복 없음, 정렬됨)
/// Deduplicated, ordered permission set
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct PermissionSet(Vec<Permission>);

impl PermissionSet {
    pub fn new(permissions: impl IntoIterator<Item = Permission>) -> Self {
        let mut permissions: Vec<Permission> = permissions.into_iter().collect();
        permissions.sort();
        permissions.dedup();
        Self(permissions)
    }

    /// 모든 권한 (Bearer 토큰용)
    pub fn all() -> Self {
        Self::new(Permission::ALL)
    }

    /// DB에 저장된 문자열 배열에서 복원 (알 수 없는 값은 무시)
    /// Rebuild from the stored TEXT[]; unknown names are dropped
    pub fn from_stored(names: &[String]) -> Self {
        Self::new(names.iter().filter_map(|n| n.parse().ok()))
    }

    pub fn to_stored(&self) -> Vec<String> {
        self.0.iter().map(|p| p.as_str().to_string()).collect()
    }

    pub fn contains(&self, permission: Permission) -> bool {
        self.0.contains(&permission)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Permission> {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permission_wire_names() {
        let parsed: Vec<Permission> = serde_json::from_str(r#"["deposit","read"]"#).unwrap();
        assert_eq!(parsed, vec![Permission::Deposit, Permission::Read]);
        assert!(serde_json::from_str::<Permission>(r#""admin""#).is_err());
    }

    #[test]
    fn test_permission_set_dedups_and_round_trips_storage() {
        let set = PermissionSet::new([Permission::Read, Permission::Deposit, Permission::Read]);
        assert_eq!(set.to_stored(), vec!["deposit".to_string(), "read".to_string()]);
        assert_eq!(PermissionSet::from_stored(&set.to_stored()), set);
        assert!(!set.contains(Permission::Transfer));
    }

    #[test]
    fn test_from_stored_ignores_unknown_names() {
        let set = PermissionSet::from_stored(&["read".to_string(), "superuser".to_string()]);
        assert_eq!(set, PermissionSet::new([Permission::Read]));
    }
}
