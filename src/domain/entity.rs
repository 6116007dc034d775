//! Shared identity and audit shape for every domain entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identity, audit timestamps and soft-delete flag carried by every entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityBase {
    pub id: Uuid,
    pub data_cadastro: DateTime<Utc>,
    pub data_atualizacao: Option<DateTime<Utc>>,
    /// Soft delete flag (false = deleted)
    pub ativo: bool,
}

impl EntityBase {
    /// Fresh identity stamped with the current time
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            data_cadastro: Utc::now(),
            data_atualizacao: None,
            ativo: true,
        }
    }

    /// Mark the entity as modified now
    pub fn touch(&mut self) {
        self.data_atualizacao = Some(Utc::now());
    }

    /// Soft delete
    pub fn desativar(&mut self) {
        self.ativo = false;
        self.touch();
    }
}

impl Default for EntityBase {
    fn default() -> Self {
        Self::new()
    }
}

/// Uninhabited include type for entities without related data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoInclude {}

/// Common contract for persisted domain entities.
///
/// Equality between entities is identity-based and explicit: use
/// [`DomainEntity::same_identity`] instead of `==`.
pub trait DomainEntity: Clone + Send + Sync + 'static {
    /// Related data that can be eagerly loaded with the entity
    type Include: Copy + Eq + std::fmt::Debug + Send + Sync + 'static;

    /// Name used in errors and logs
    const NAME: &'static str;

    fn base(&self) -> &EntityBase;

    fn base_mut(&mut self) -> &mut EntityBase;

    fn id(&self) -> Uuid {
        self.base().id
    }

    fn is_active(&self) -> bool {
        self.base().ativo
    }

    /// Identity comparison (same concrete type, same id)
    fn same_identity(&self, other: &Self) -> bool {
        self.id() == other.id()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_base_is_active_and_untouched() {
        let base = EntityBase::new();
        assert!(base.ativo);
        assert!(base.data_atualizacao.is_none());
    }

    #[test]
    fn test_desativar_flips_flag_and_touches() {
        let mut base = EntityBase::new();
        base.desativar();
        assert!(!base.ativo);
        assert!(base.data_atualizacao.is_some());
    }

    #[test]
    fn test_ids_are_unique() {
        assert_ne!(EntityBase::new().id, EntityBase::new().id);
    }
}
