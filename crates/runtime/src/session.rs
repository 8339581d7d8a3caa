//! Synchronous session facade over [`ClassEngine`].
//!
//! A [`Session`] owns one engine and, optionally, a repository for character
//! blobs. Every mutation goes through the engine; the session adds what the
//! engine deliberately leaves out: tracing, persistence, and collection of
//! host values that must be restored when buffs leave the ledger.

use std::sync::Arc;

use tracing::{debug, info, warn};

use class_content::WeaponCatalog;
use class_core::{
    BuffCleanup, BuffInstance, CharacterId, ClassDefinition, ClassEngine, ClassId, EffectKey,
    EquipEvent, EventEffect, GameTime, InboundEvent, LevelChange, PersistenceError,
    ProgressionConfig, RemovalReason, ResetOutcome, TimedEvent,
};

use crate::config::RuntimeConfig;
use crate::error::Result;
use crate::repository::{FileProgressRepo, ProgressRepository};

/// Host value to write back after a buff carrying a baseline was removed.
///
/// Other slows on the character may still be running, so the host writes
/// [`SpeedRestore::speed`], not the bare baseline.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpeedRestore {
    pub character: CharacterId,
    pub key: EffectKey,
    /// Base speed captured when the removed buff first applied.
    pub baseline: f32,
    /// Combined movement multiplier still in effect after the removal.
    pub multiplier: f32,
    pub reason: RemovalReason,
}

impl SpeedRestore {
    /// Speed the host should write back.
    pub fn speed(&self) -> f32 {
        self.baseline * self.multiplier
    }
}

/// What a session produced for one inbound event.
#[derive(Clone, Debug, PartialEq)]
pub struct HandledEvent {
    pub effect: EventEffect,
    pub restores: Vec<SpeedRestore>,
}

/// How [`Session::load_character`] resolved a character's progress.
#[derive(Clone, Debug, PartialEq)]
pub enum LoadStatus {
    /// No blob stored (or persistence disabled); the character starts fresh.
    Fresh,
    /// Blob restored; lists active classes dropped to keep the class cap.
    Restored { dropped: Vec<ClassId> },
    /// Blob was unreadable; the character was reset to a fresh record.
    Corrupted(PersistenceError),
}

/// Buff cleanup that logs removals and records baselines to restore.
#[derive(Default)]
struct RestoreCollector {
    restores: Vec<SpeedRestore>,
}

impl BuffCleanup for RestoreCollector {
    fn on_buff_removed(
        &mut self,
        character: CharacterId,
        buff: &BuffInstance,
        reason: RemovalReason,
    ) {
        debug!(
            target: "runtime::buffs",
            character = character.0,
            key = %buff.key,
            stacks = buff.stacks,
            ?reason,
            "buff removed"
        );
        if let Some(baseline) = buff.baseline {
            self.restores.push(SpeedRestore {
                character,
                key: buff.key,
                baseline,
                multiplier: 1.0,
                reason,
            });
        }
    }
}

pub struct Session {
    engine: ClassEngine,
    repository: Option<Arc<dyn ProgressRepository>>,
    catalog: WeaponCatalog,
}

impl Session {
    /// Session without persistence. Item names are classified by the name
    /// heuristics alone until [`Session::with_catalog`] supplies overrides.
    pub fn new(config: ProgressionConfig) -> Self {
        Self {
            engine: ClassEngine::new(config),
            repository: None,
            catalog: WeaponCatalog::default(),
        }
    }

    pub fn with_repository(
        config: ProgressionConfig,
        repository: Arc<dyn ProgressRepository>,
    ) -> Self {
        Self {
            repository: Some(repository),
            ..Self::new(config)
        }
    }

    pub fn with_catalog(mut self, catalog: WeaponCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    /// Opens a session from runtime configuration, backed by a
    /// [`FileProgressRepo`] when persistence is enabled.
    pub fn open(config: &RuntimeConfig) -> Result<Self> {
        let progression = config.load_progression()?;
        let catalog = config.load_weapon_catalog()?;
        if !config.enable_persistence {
            info!(target: "runtime::session", "Session opened without persistence");
            return Ok(Self::new(progression).with_catalog(catalog));
        }

        let dir = config.resolve_save_dir();
        let repository = FileProgressRepo::new(&dir)?;
        info!(
            target: "runtime::session",
            save_dir = %dir.display(),
            "Session opened with file persistence"
        );
        Ok(Self::with_repository(progression, Arc::new(repository)).with_catalog(catalog))
    }

    pub fn engine(&self) -> &ClassEngine {
        &self.engine
    }

    pub fn repository(&self) -> Option<&Arc<dyn ProgressRepository>> {
        self.repository.as_ref()
    }

    // ========================================================================
    // Persistence
    // ========================================================================

    /// Restores `character` from the repository.
    ///
    /// A corrupt blob is not an error: the character is reset to a fresh
    /// record and the failure is logged and reported as
    /// [`LoadStatus::Corrupted`]. Only repository failures propagate.
    pub fn load_character(&mut self, character: CharacterId) -> Result<LoadStatus> {
        let Some(repository) = &self.repository else {
            return Ok(LoadStatus::Fresh);
        };
        let Some(blob) = repository.load(character)? else {
            debug!(target: "runtime::persistence", character = character.0, "no saved progress");
            return Ok(LoadStatus::Fresh);
        };

        match self.engine.restore_character(character, &blob) {
            Ok(dropped) => {
                if !dropped.is_empty() {
                    warn!(
                        target: "runtime::persistence",
                        character = character.0,
                        ?dropped,
                        "saved active classes exceeded the class cap; extras deactivated"
                    );
                }
                info!(
                    target: "runtime::persistence",
                    character = character.0,
                    bytes = blob.len(),
                    "character progress restored"
                );
                Ok(LoadStatus::Restored { dropped })
            }
            Err(error) => {
                warn!(
                    target: "runtime::persistence",
                    character = character.0,
                    %error,
                    "corrupt character blob; starting from a fresh record"
                );
                Ok(LoadStatus::Corrupted(error))
            }
        }
    }

    /// Writes `character` to the repository. Returns `false` when
    /// persistence is disabled.
    pub fn save_character(&self, character: CharacterId) -> Result<bool> {
        let Some(repository) = &self.repository else {
            return Ok(false);
        };
        let blob = self.engine.serialize_character(character)?;
        repository.save(character, &blob)?;
        debug!(
            target: "runtime::persistence",
            character = character.0,
            bytes = blob.len(),
            "character progress saved"
        );
        Ok(true)
    }

    /// Saves every character the engine tracks; returns how many were written.
    pub fn save_all(&self) -> Result<usize> {
        if self.repository.is_none() {
            return Ok(0);
        }
        let characters: Vec<CharacterId> = self.engine.characters().collect();
        for character in &characters {
            self.save_character(*character)?;
        }
        Ok(characters.len())
    }

    // ========================================================================
    // Administrative operations
    // ========================================================================

    pub fn add_xp(&mut self, character: CharacterId, class: ClassId, amount: f64) -> LevelChange {
        let change = self.engine.add_xp(character, class, amount);
        log_level_change(character, &change);
        change
    }

    pub fn set_active_class(&mut self, character: CharacterId, class: ClassId) {
        self.engine.set_sole_active_class(character, class);
        info!(target: "runtime::classes", character = character.0, %class, "active class set");
    }

    pub fn add_active_class(&mut self, character: CharacterId, class: ClassId) -> Result<()> {
        self.engine.add_active_class(character, class)?;
        info!(target: "runtime::classes", character = character.0, %class, "class activated");
        Ok(())
    }

    pub fn reset_class_progress(&mut self, character: CharacterId, class: ClassId) -> ResetOutcome {
        let outcome = self.engine.reset_class_progress(character, class);
        info!(
            target: "runtime::classes",
            character = character.0,
            %class,
            had_progress = outcome.had_progress,
            deactivated = ?outcome.deactivated,
            "class progress reset"
        );
        outcome
    }

    // ========================================================================
    // Event routing
    // ========================================================================

    /// Routes one inbound event through the engine and logs what it changed.
    pub fn handle(&mut self, timed: &TimedEvent) -> HandledEvent {
        let mut collector = RestoreCollector::default();
        let effect = self.engine.handle(timed, &mut collector);
        log_effect(timed, &effect);

        let mut restores = collector.restores;
        for restore in &mut restores {
            restore.multiplier = self.engine.movement_multiplier(restore.character, timed.at);
        }
        HandledEvent { effect, restores }
    }

    /// Equips host items by name. The catalog resolves each name to a weapon
    /// category; an empty main-hand name means bare hands.
    pub fn equip_item(
        &mut self,
        character: CharacterId,
        now: GameTime,
        weapon: &str,
        offhand: Option<&str>,
    ) -> HandledEvent {
        let event = EquipEvent {
            character,
            weapon: self.catalog.categorize(weapon),
            offhand: offhand.map(|name| self.catalog.categorize(name)),
        };
        debug!(
            target: "runtime::session",
            character = character.0,
            item = weapon,
            weapon = %event.weapon,
            "item equipped"
        );
        self.handle(&TimedEvent::new(now, InboundEvent::Equip(event)))
    }

    /// Shorthand for a [`InboundEvent::Tick`] at `now`.
    pub fn tick(&mut self, now: GameTime) -> HandledEvent {
        self.handle(&TimedEvent::new(now, InboundEvent::Tick))
    }
}

/// Character whose progress an event can change.
fn progress_owner(event: &InboundEvent) -> Option<CharacterId> {
    match event {
        InboundEvent::AddXp { character, .. } => Some(*character),
        InboundEvent::DamageApplied(applied) => Some(applied.attacker),
        InboundEvent::BlockSucceeded(block) => Some(block.defender),
        _ => None,
    }
}

fn log_effect(timed: &TimedEvent, effect: &EventEffect) {
    let kind = timed.event.as_str();
    let at = timed.at.as_millis();
    let owner = progress_owner(&timed.event);

    match effect {
        EventEffect::Level(change) => {
            if let Some(character) = owner {
                log_level_change(character, change);
            }
        }
        EventEffect::Applied(changes) => {
            if let Some(character) = owner {
                changes.iter().for_each(|c| log_level_change(character, c));
            }
        }
        EventEffect::Block(outcome) => {
            if let Some(character) = owner {
                outcome
                    .level_changes
                    .iter()
                    .for_each(|c| log_level_change(character, c));
            }
            if !outcome.triggered.is_empty() {
                debug!(
                    target: "runtime::perks",
                    at,
                    triggered = outcome.triggered.len(),
                    reflected = outcome.reflected,
                    "block perks fired"
                );
            }
        }
        EventEffect::Activation(Err(error)) => {
            warn!(target: "runtime::classes", at, %error, "activation rejected");
        }
        EventEffect::Damage(outcome) => {
            debug!(
                target: "runtime::damage",
                at,
                multiplier = outcome.multiplier,
                reduction = outcome.reduction,
                true_damage = outcome.true_damage,
                triggered = outcome.triggered.len(),
                "damage resolved"
            );
        }
        EventEffect::Tick(report) => {
            if report.expired > 0 || !report.dots.is_empty() || !report.granted.is_empty() {
                debug!(
                    target: "runtime::buffs",
                    at,
                    expired = report.expired,
                    dots = report.dots.len(),
                    granted = report.granted.len(),
                    "tick"
                );
            }
        }
        EventEffect::Cleared(count) => {
            debug!(target: "runtime::buffs", at, event = kind, cleared = count, "buffs cleared");
        }
        _ => {
            debug!(target: "runtime::session", at, event = kind, "event handled");
        }
    }
}

fn log_level_change(character: CharacterId, change: &LevelChange) {
    if change.leveled_up() {
        info!(
            target: "runtime::progress",
            character = character.0,
            class = %change.class,
            level = change.new_level,
            "class level up"
        );
    }
    let definition = ClassDefinition::get(change.class);
    for level in &change.perk_levels {
        if let Some(perk) = definition.perks.iter().find(|p| p.unlock_level == *level) {
            info!(
                target: "runtime::perks",
                character = character.0,
                class = %change.class,
                level = *level,
                perk = perk.name,
                "perk unlocked"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::InMemoryProgressRepo;
    use class_core::{
        DamageEvent, DamageKind, DamageTypes, EffectKind, WeaponCategory, xp_for_level,
    };

    const HERO: CharacterId = CharacterId(1);

    fn persistent_session() -> (Session, Arc<InMemoryProgressRepo>) {
        let repo = Arc::new(InMemoryProgressRepo::new());
        let session = Session::with_repository(ProgressionConfig::default(), repo.clone());
        (session, repo)
    }

    #[test]
    fn save_then_load_restores_progress() {
        let (mut session, repo) = persistent_session();
        session.add_xp(HERO, ClassId::Archer, 5_106.0);
        session.set_active_class(HERO, ClassId::Archer);
        assert!(session.save_character(HERO).unwrap());

        let mut reopened = Session::with_repository(ProgressionConfig::default(), repo);
        assert_eq!(
            reopened.load_character(HERO).unwrap(),
            LoadStatus::Restored { dropped: vec![] }
        );
        assert_eq!(reopened.engine().level(HERO, ClassId::Archer), 10);
        assert_eq!(reopened.engine().active_classes(HERO), &[ClassId::Archer]);
    }

    #[test]
    fn corrupt_blob_falls_back_to_fresh_record() {
        let (mut session, repo) = persistent_session();
        repo.save(HERO, b"not a blob").unwrap();

        let status = session.load_character(HERO).unwrap();
        assert!(matches!(status, LoadStatus::Corrupted(_)));
        assert_eq!(session.engine().level(HERO, ClassId::Archer), 0);
        assert!(session.engine().active_classes(HERO).is_empty());
    }

    #[test]
    fn without_repository_nothing_is_saved() {
        let mut session = Session::new(ProgressionConfig::default());
        session.add_xp(HERO, ClassId::Wizard, 100.0);

        assert!(!session.save_character(HERO).unwrap());
        assert_eq!(session.save_all().unwrap(), 0);
        assert_eq!(session.load_character(HERO).unwrap(), LoadStatus::Fresh);
    }

    #[test]
    fn save_all_writes_every_tracked_character() {
        let (mut session, repo) = persistent_session();
        session.add_xp(CharacterId(1), ClassId::Lancer, 10.0);
        session.add_xp(CharacterId(2), ClassId::Bulwark, 10.0);

        assert_eq!(session.save_all().unwrap(), 2);
        assert_eq!(repo.list_characters().unwrap(), vec![CharacterId(1), CharacterId(2)]);
    }

    #[test]
    fn expired_slow_restores_speed_under_remaining_poison() {
        const CRUSHER: CharacterId = CharacterId(3);
        const WOLF: CharacterId = CharacterId(2);

        let mut session = Session::new(ProgressionConfig::default());
        session.add_xp(CRUSHER, ClassId::Crusher, xp_for_level(20));
        session.set_active_class(CRUSHER, ClassId::Crusher);
        session.add_xp(HERO, ClassId::Assassin, xp_for_level(20));
        session.set_active_class(HERO, ClassId::Assassin);

        let slam = DamageEvent::new(
            CRUSHER,
            WOLF,
            WeaponCategory::Blunt,
            DamageTypes::of(DamageKind::Blunt, 30.0),
        )
        .with_target_base_speed(6.0);
        let stab = DamageEvent::new(
            HERO,
            WOLF,
            WeaponCategory::Knife,
            DamageTypes::of(DamageKind::Pierce, 20.0),
        )
        .with_skill(30.0)
        .with_target_base_speed(6.0);
        session.handle(&TimedEvent::new(
            GameTime::ZERO,
            InboundEvent::DamageAboutToApply(slam),
        ));
        session.handle(&TimedEvent::new(
            GameTime::from_millis(100),
            InboundEvent::DamageAboutToApply(stab),
        ));

        let handled = session.tick(GameTime::from_secs(3));
        let [restore] = handled.restores.as_slice() else {
            panic!("expected one restore, got {:?}", handled.restores);
        };
        assert_eq!(restore.key.kind, EffectKind::MovementSlow);
        assert_eq!(restore.baseline, 6.0);
        assert!((restore.multiplier - 0.8).abs() < 1e-6);
        assert!((restore.speed() - 4.8).abs() < 1e-5);

        let handled = session.tick(GameTime::from_secs(11));
        let [restore] = handled.restores.as_slice() else {
            panic!("expected one restore, got {:?}", handled.restores);
        };
        assert_eq!(restore.key, EffectKey::POISON);
        assert_eq!(restore.speed(), 6.0);
    }

    #[test]
    fn item_names_resolve_through_the_catalog() {
        let catalog = WeaponCatalog::shipped().unwrap();
        let mut session = Session::new(ProgressionConfig::default()).with_catalog(catalog);

        session.equip_item(HERO, GameTime::ZERO, "Hammer", None);
        let loadout = session.engine().character(HERO).unwrap().loadout;
        assert_eq!(loadout.weapon, Some(WeaponCategory::Tool));

        session.equip_item(HERO, GameTime::ZERO, "SwordIron", Some("ShieldWood"));
        let loadout = session.engine().character(HERO).unwrap().loadout;
        assert_eq!(loadout.weapon, Some(WeaponCategory::Sword));
        assert_eq!(loadout.offhand, Some(WeaponCategory::Shield));

        session.equip_item(HERO, GameTime::ZERO, "", None);
        let loadout = session.engine().character(HERO).unwrap().loadout;
        assert_eq!(loadout.weapon, Some(WeaponCategory::Unarmed));
    }

    #[test]
    fn rejected_activation_surfaces_as_error() {
        let mut session = Session::new(ProgressionConfig::default());
        session.set_active_class(HERO, ClassId::Archer);

        assert!(session.add_active_class(HERO, ClassId::Wizard).is_err());
        assert_eq!(session.engine().active_classes(HERO), &[ClassId::Archer]);
    }
}
