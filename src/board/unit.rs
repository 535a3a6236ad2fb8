//! Units on the board.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::cards::{EffectKind, UnitData, UnitRange};
use crate::core::{PlayerId, UnitId};
use crate::effects::TargetRef;
use crate::keywords::{Keyword, KeywordLedger};
use crate::triggers::UnitTrigger;

use super::row::RowId;
use super::stats::StatState;

/// An attack bonus granted by an Empowering neighbour.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AuraGrant {
    pub source: UnitId,
    pub amount: i32,
}

/// A live unit instance.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unit {
    pub id: UnitId,
    pub data: Arc<UnitData>,
    pub owner: PlayerId,
    /// Current row class. Starts as the template's range and changes with
    /// Push and Pull.
    pub range: UnitRange,
    pub stats: StatState,
    pub keywords: KeywordLedger,
    pub has_attacked: bool,
    pub is_dead: bool,
    /// The last thing this unit fought, for LastAttacked targeting.
    pub last_attacked: Option<TargetRef>,
    /// The trigger the unit's abilities run on.
    pub binding: Option<UnitTrigger>,
    /// Empowering bonuses currently applied to this unit.
    pub aura_grants: SmallVec<[AuraGrant; 2]>,
}

impl Unit {
    /// Instantiate a template. Keywords are added by the rules, not here.
    #[must_use]
    pub fn new(id: UnitId, data: Arc<UnitData>, owner: PlayerId) -> Self {
        Self {
            id,
            owner,
            range: data.range,
            stats: StatState::new(data.base_health, data.base_attack),
            keywords: KeywordLedger::new(),
            has_attacked: true,
            is_dead: false,
            last_attacked: None,
            binding: data.binding_trigger(),
            aura_grants: SmallVec::new(),
            data,
        }
    }

    /// The row this unit stands in.
    #[must_use]
    pub fn row(&self) -> RowId {
        RowId::new(self.owner, self.range)
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.data.name
    }

    #[must_use]
    pub fn current_attack(&self) -> i32 {
        self.stats.current_attack()
    }

    #[must_use]
    pub fn current_health(&self) -> i32 {
        self.stats.current_health()
    }

    #[must_use]
    pub fn has(&self, keyword: Keyword) -> bool {
        self.keywords.has(keyword)
    }

    #[must_use]
    pub fn is_alive(&self) -> bool {
        !self.is_dead
    }

    /// Whether this unit may be picked up to attack.
    ///
    /// ```
    /// use std::sync::Arc;
    /// use row_battle::board::Unit;
    /// use row_battle::cards::UnitData;
    /// use row_battle::core::{PlayerId, UnitId};
    ///
    /// let mut unit = Unit::new(UnitId(0), Arc::new(UnitData::new("Scout", 2, 2)), PlayerId::FIRST);
    /// assert!(!unit.can_attack()); // summoning sickness
    /// unit.has_attacked = false;
    /// assert!(unit.can_attack());
    /// ```
    #[must_use]
    pub fn can_attack(&self) -> bool {
        !self.is_dead
            && !self.has_attacked
            && self.current_attack() > 0
            && !self.has(Keyword::Stunned)
            && !self.has(Keyword::Warden)
    }

    /// Attack bonus this unit hands to its row while it holds Empowering.
    ///
    /// Taken from the template's first ability when that ability is an
    /// attack buff.
    #[must_use]
    pub fn empowering_amount(&self) -> Option<i32> {
        if !self.has(Keyword::Empowering) {
            return None;
        }
        self.data
            .abilities
            .first()
            .filter(|a| a.kind == EffectKind::BuffAttack)
            .map(|a| a.two)
    }

    /// Record and apply an aura bonus.
    pub fn receive_aura(&mut self, source: UnitId, amount: i32) {
        self.stats.temporary_attack_bonus += amount;
        self.aura_grants.push(AuraGrant { source, amount });
    }

    /// Undo the bonus granted by one source. Returns true if any was held.
    pub fn revoke_aura(&mut self, source: UnitId) -> bool {
        let before = self.aura_grants.len();
        let mut removed = 0;
        self.aura_grants.retain(|g| {
            if g.source == source {
                removed += g.amount;
                false
            } else {
                true
            }
        });
        self.stats.temporary_attack_bonus -= removed;
        self.aura_grants.len() != before
    }

    /// Undo every received aura bonus.
    pub fn revoke_all_auras(&mut self) {
        let total: i32 = self.aura_grants.iter().map(|g| g.amount).sum();
        self.stats.temporary_attack_bonus -= total;
        self.aura_grants.clear();
    }
}

impl std::fmt::Display for Unit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} '{}' {}/{}",
            self.id,
            self.data.name,
            self.current_attack(),
            self.current_health()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::SummonAbility;
    use crate::effects::TargetSpec;
    use crate::keywords::{DecayBinding, PERMANENT};

    fn unit(data: UnitData) -> Unit {
        Unit::new(UnitId(1), Arc::new(data), PlayerId::FIRST)
    }

    #[test]
    fn test_new_from_template() {
        let u = unit(UnitData::new("Archer", 2, 3).with_range(UnitRange::Ranged));
        assert_eq!(u.range, UnitRange::Ranged);
        assert_eq!(u.row(), RowId::new(PlayerId::FIRST, UnitRange::Ranged));
        assert_eq!(u.current_attack(), 2);
        assert_eq!(u.current_health(), 3);
        assert!(u.has_attacked);
        assert_eq!(u.binding, None);
    }

    #[test]
    fn test_selection_rule() {
        let mut u = unit(UnitData::new("Guard", 2, 3));
        u.has_attacked = false;
        assert!(u.can_attack());

        u.keywords.add(Keyword::Warden, PERMANENT, DecayBinding::OwnerTurnStart, false);
        assert!(!u.can_attack());
        u.keywords.remove(Keyword::Warden);

        u.keywords.add(Keyword::Stunned, 1, DecayBinding::OwnerTurnStart, true);
        assert!(!u.can_attack());
        u.keywords.remove(Keyword::Stunned);

        u.stats.temporary_attack_bonus = -2;
        assert!(!u.can_attack());
    }

    #[test]
    fn test_empowering_amount() {
        let data = UnitData::new("Banner", 1, 4).with_ability(
            SummonAbility::new(UnitTrigger::None, EffectKind::BuffAttack, TargetSpec::CURRENT_ROW)
                .with_attributes(0, 2, 0),
        );
        let mut u = unit(data);
        assert_eq!(u.empowering_amount(), None);

        u.keywords.add(Keyword::Empowering, PERMANENT, DecayBinding::OwnerTurnStart, false);
        assert_eq!(u.empowering_amount(), Some(2));
    }

    #[test]
    fn test_aura_grants() {
        let mut u = unit(UnitData::new("Footman", 1, 1));
        u.receive_aura(UnitId(7), 2);
        u.receive_aura(UnitId(8), 1);
        assert_eq!(u.current_attack(), 4);

        assert!(u.revoke_aura(UnitId(7)));
        assert!(!u.revoke_aura(UnitId(7)));
        assert_eq!(u.current_attack(), 2);

        u.revoke_all_auras();
        assert_eq!(u.current_attack(), 1);
        assert!(u.aura_grants.is_empty());
    }
}
