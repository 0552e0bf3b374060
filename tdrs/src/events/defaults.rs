//! Built-in effects.

use tracing::debug;

use crate::engine::SocialEngine;
use crate::error::{Result, SocialEngineError};
use crate::stats::{ModifierSource, StatModifier, StatModifierType};

use super::effects::{Effect, EffectContext, EffectFactory, EffectLibrary};

/// Register every built-in effect factory.
pub fn register_default_effects(library: &mut EffectLibrary) {
    library.add_effect_factory(AddAgentTraitFactory);
    library.add_effect_factory(RemoveAgentTraitFactory);
    library.add_effect_factory(AddRelationshipTraitFactory);
    library.add_effect_factory(RemoveRelationshipTraitFactory);
    library.add_effect_factory(AddAgentStatBuffFactory);
    library.add_effect_factory(IncrementAgentBaseStatFactory);
    library.add_effect_factory(IncreaseRelationshipStatFactory);
    library.add_effect_factory(AddRelationshipStatBuffFactory);
}

fn expect_args(effect: &str, args: &[&str], min: usize) -> Result<()> {
    if args.len() < min {
        return Err(SocialEngineError::EffectArgument {
            effect: effect.to_string(),
            message: format!(
                "expected at least {} arguments but was {} ('{}')",
                min,
                args.len(),
                args.join(" ")
            ),
        });
    }
    Ok(())
}

/// Optional trailing duration. Missing means permanent.
fn parse_duration(effect: &str, arg: Option<&&str>) -> Result<i32> {
    match arg {
        None => Ok(-1),
        Some(arg) => arg.parse().map_err(|_| SocialEngineError::EffectArgument {
            effect: effect.to_string(),
            message: format!("expected integer duration but was '{}'", arg),
        }),
    }
}

fn parse_value(effect: &str, arg: &str) -> Result<f64> {
    arg.parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| SocialEngineError::EffectArgument {
            effect: effect.to_string(),
            message: format!("expected number but was '{}'", arg),
        })
}

fn require_agent(engine: &SocialEngine, ctx: &EffectContext, arg: &str) -> Result<String> {
    let uid = ctx.resolve_uid(arg)?;
    if !engine.has_agent(&uid) {
        return Err(SocialEngineError::AgentNotFound { uid });
    }
    Ok(uid)
}

fn require_relationship(
    engine: &SocialEngine,
    ctx: &EffectContext,
    owner_arg: &str,
    target_arg: &str,
) -> Result<(String, String)> {
    let owner = ctx.resolve_uid(owner_arg)?;
    let target = ctx.resolve_uid(target_arg)?;
    if !engine.has_relationship(&owner, &target) {
        return Err(SocialEngineError::RelationshipNotFound { owner, target });
    }
    Ok((owner, target))
}

fn description_override(ctx: &EffectContext) -> Option<String> {
    Some(ctx.description()).filter(|d| !d.is_empty())
}

/// `AddAgentTrait ?agent trait [duration]`
#[derive(Debug, Clone)]
pub struct AddAgentTrait {
    pub agent: String,
    pub trait_id: String,
    pub duration: i32,
    pub description: Option<String>,
}

impl Effect for AddAgentTrait {
    fn apply(&self, engine: &mut SocialEngine) -> Result<()> {
        engine.add_agent_trait(
            &self.agent,
            &self.trait_id,
            self.duration,
            self.description.as_deref(),
        )?;
        Ok(())
    }
}

pub struct AddAgentTraitFactory;

impl EffectFactory for AddAgentTraitFactory {
    fn effect_name(&self) -> &str {
        "AddAgentTrait"
    }

    fn create_instance(
        &self,
        engine: &SocialEngine,
        ctx: &EffectContext,
        args: &[&str],
    ) -> Result<Box<dyn Effect>> {
        expect_args(self.effect_name(), args, 2)?;

        Ok(Box::new(AddAgentTrait {
            agent: require_agent(engine, ctx, args[0])?,
            trait_id: args[1].to_string(),
            duration: parse_duration(self.effect_name(), args.get(2))?,
            description: description_override(ctx),
        }))
    }
}

/// `RemoveAgentTrait ?agent trait`
#[derive(Debug, Clone)]
pub struct RemoveAgentTrait {
    pub agent: String,
    pub trait_id: String,
}

impl Effect for RemoveAgentTrait {
    fn apply(&self, engine: &mut SocialEngine) -> Result<()> {
        engine.remove_agent_trait(&self.agent, &self.trait_id)?;
        Ok(())
    }
}

pub struct RemoveAgentTraitFactory;

impl EffectFactory for RemoveAgentTraitFactory {
    fn effect_name(&self) -> &str {
        "RemoveAgentTrait"
    }

    fn create_instance(
        &self,
        engine: &SocialEngine,
        ctx: &EffectContext,
        args: &[&str],
    ) -> Result<Box<dyn Effect>> {
        expect_args(self.effect_name(), args, 2)?;

        Ok(Box::new(RemoveAgentTrait {
            agent: require_agent(engine, ctx, args[0])?,
            trait_id: args[1].to_string(),
        }))
    }
}

/// `AddRelationshipTrait ?owner ?target trait [duration]`
#[derive(Debug, Clone)]
pub struct AddRelationshipTrait {
    pub owner: String,
    pub target: String,
    pub trait_id: String,
    pub duration: i32,
    pub description: Option<String>,
}

impl Effect for AddRelationshipTrait {
    fn apply(&self, engine: &mut SocialEngine) -> Result<()> {
        engine.add_relationship_trait(
            &self.owner,
            &self.target,
            &self.trait_id,
            self.duration,
            self.description.as_deref(),
        )?;
        Ok(())
    }
}

pub struct AddRelationshipTraitFactory;

impl EffectFactory for AddRelationshipTraitFactory {
    fn effect_name(&self) -> &str {
        "AddRelationshipTrait"
    }

    fn create_instance(
        &self,
        engine: &SocialEngine,
        ctx: &EffectContext,
        args: &[&str],
    ) -> Result<Box<dyn Effect>> {
        expect_args(self.effect_name(), args, 3)?;
        let (owner, target) = require_relationship(engine, ctx, args[0], args[1])?;

        Ok(Box::new(AddRelationshipTrait {
            owner,
            target,
            trait_id: args[2].to_string(),
            duration: parse_duration(self.effect_name(), args.get(3))?,
            description: description_override(ctx),
        }))
    }
}

/// `RemoveRelationshipTrait ?owner ?target trait`
#[derive(Debug, Clone)]
pub struct RemoveRelationshipTrait {
    pub owner: String,
    pub target: String,
    pub trait_id: String,
}

impl Effect for RemoveRelationshipTrait {
    fn apply(&self, engine: &mut SocialEngine) -> Result<()> {
        engine.remove_relationship_trait(&self.owner, &self.target, &self.trait_id)?;
        Ok(())
    }
}

pub struct RemoveRelationshipTraitFactory;

impl EffectFactory for RemoveRelationshipTraitFactory {
    fn effect_name(&self) -> &str {
        "RemoveRelationshipTrait"
    }

    fn create_instance(
        &self,
        engine: &SocialEngine,
        ctx: &EffectContext,
        args: &[&str],
    ) -> Result<Box<dyn Effect>> {
        expect_args(self.effect_name(), args, 3)?;
        let (owner, target) = require_relationship(engine, ctx, args[0], args[1])?;

        Ok(Box::new(RemoveRelationshipTrait {
            owner,
            target,
            trait_id: args[2].to_string(),
        }))
    }
}

/// `AddAgentStatBuff ?agent stat value [duration]`
#[derive(Debug, Clone)]
pub struct AddAgentStatBuff {
    pub agent: String,
    pub stat: String,
    pub value: f64,
    pub duration: i32,
}

impl Effect for AddAgentStatBuff {
    fn apply(&self, engine: &mut SocialEngine) -> Result<()> {
        let modifier = StatModifier::new(self.stat.clone(), self.value, StatModifierType::Flat)
            .with_source(ModifierSource::Effect("AddAgentStatBuff".to_string()))
            .with_duration(self.duration);

        engine
            .agent_mut(&self.agent)?
            .stats_mut()
            .stat_mut(&self.stat)?
            .add_modifier(modifier);

        debug!(agent = %self.agent, stat = %self.stat, value = self.value, "agent stat buffed");
        Ok(())
    }
}

pub struct AddAgentStatBuffFactory;

impl EffectFactory for AddAgentStatBuffFactory {
    fn effect_name(&self) -> &str {
        "AddAgentStatBuff"
    }

    fn create_instance(
        &self,
        engine: &SocialEngine,
        ctx: &EffectContext,
        args: &[&str],
    ) -> Result<Box<dyn Effect>> {
        expect_args(self.effect_name(), args, 3)?;

        Ok(Box::new(AddAgentStatBuff {
            agent: require_agent(engine, ctx, args[0])?,
            stat: args[1].to_string(),
            value: parse_value(self.effect_name(), args[2])?,
            duration: parse_duration(self.effect_name(), args.get(3))?,
        }))
    }
}

/// `IncrementAgentBaseStat ?agent stat value`
#[derive(Debug, Clone)]
pub struct IncrementAgentBaseStat {
    pub agent: String,
    pub stat: String,
    pub value: f64,
}

impl Effect for IncrementAgentBaseStat {
    fn apply(&self, engine: &mut SocialEngine) -> Result<()> {
        engine
            .agent_mut(&self.agent)?
            .stats_mut()
            .stat_mut(&self.stat)?
            .increment_base_value(self.value);
        Ok(())
    }
}

pub struct IncrementAgentBaseStatFactory;

impl EffectFactory for IncrementAgentBaseStatFactory {
    fn effect_name(&self) -> &str {
        "IncrementAgentBaseStat"
    }

    fn create_instance(
        &self,
        engine: &SocialEngine,
        ctx: &EffectContext,
        args: &[&str],
    ) -> Result<Box<dyn Effect>> {
        expect_args(self.effect_name(), args, 3)?;

        Ok(Box::new(IncrementAgentBaseStat {
            agent: require_agent(engine, ctx, args[0])?,
            stat: args[1].to_string(),
            value: parse_value(self.effect_name(), args[2])?,
        }))
    }
}

/// `IncreaseRelationshipStat ?owner ?target stat value`
#[derive(Debug, Clone)]
pub struct IncreaseRelationshipStat {
    pub owner: String,
    pub target: String,
    pub stat: String,
    pub value: f64,
}

impl Effect for IncreaseRelationshipStat {
    fn apply(&self, engine: &mut SocialEngine) -> Result<()> {
        engine
            .relationship_mut(&self.owner, &self.target)?
            .stats_mut()
            .stat_mut(&self.stat)?
            .increment_base_value(self.value);
        Ok(())
    }
}

pub struct IncreaseRelationshipStatFactory;

impl EffectFactory for IncreaseRelationshipStatFactory {
    fn effect_name(&self) -> &str {
        "IncreaseRelationshipStat"
    }

    fn create_instance(
        &self,
        engine: &SocialEngine,
        ctx: &EffectContext,
        args: &[&str],
    ) -> Result<Box<dyn Effect>> {
        expect_args(self.effect_name(), args, 4)?;
        let (owner, target) = require_relationship(engine, ctx, args[0], args[1])?;

        Ok(Box::new(IncreaseRelationshipStat {
            owner,
            target,
            stat: args[2].to_string(),
            value: parse_value(self.effect_name(), args[3])?,
        }))
    }
}

/// `AddRelationshipStatBuff ?owner ?target stat value [duration]`
#[derive(Debug, Clone)]
pub struct AddRelationshipStatBuff {
    pub owner: String,
    pub target: String,
    pub stat: String,
    pub value: f64,
    pub duration: i32,
}

impl Effect for AddRelationshipStatBuff {
    fn apply(&self, engine: &mut SocialEngine) -> Result<()> {
        let modifier = StatModifier::new(self.stat.clone(), self.value, StatModifierType::Flat)
            .with_source(ModifierSource::Effect("AddRelationshipStatBuff".to_string()))
            .with_duration(self.duration);

        engine
            .relationship_mut(&self.owner, &self.target)?
            .stats_mut()
            .stat_mut(&self.stat)?
            .add_modifier(modifier);
        Ok(())
    }
}

pub struct AddRelationshipStatBuffFactory;

impl EffectFactory for AddRelationshipStatBuffFactory {
    fn effect_name(&self) -> &str {
        "AddRelationshipStatBuff"
    }

    fn create_instance(
        &self,
        engine: &SocialEngine,
        ctx: &EffectContext,
        args: &[&str],
    ) -> Result<Box<dyn Effect>> {
        expect_args(self.effect_name(), args, 4)?;
        let (owner, target) = require_relationship(engine, ctx, args[0], args[1])?;

        Ok(Box::new(AddRelationshipStatBuff {
            owner,
            target,
            stat: args[2].to_string(),
            value: parse_value(self.effect_name(), args[3])?,
            duration: parse_duration(self.effect_name(), args.get(4))?,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{AgentSchema, RelationshipSchema};
    use crate::stats::StatSchema;
    use repraxis::{RawBindings, Value};

    fn engine() -> SocialEngine {
        let mut engine = SocialEngine::new();
        engine.add_agent_schema(
            AgentSchema::new("character")
                .with_stat(StatSchema::new("Confidence", 0.0, 0.0, 50.0, true)),
        );
        engine.add_relationship_schema(
            RelationshipSchema::new("character", "character")
                .with_stat(StatSchema::new("Friendship", 0.0, 0.0, 50.0, true)),
        );
        engine.add_agent("character", "astrid").unwrap();
        engine.add_agent("character", "jordan").unwrap();
        engine.add_relationship("astrid", "jordan").unwrap();
        engine
    }

    fn ctx() -> EffectContext {
        let bindings: RawBindings = [
            ("?initiator".to_string(), Value::from("astrid")),
            ("?target".to_string(), Value::from("jordan")),
        ]
        .into_iter()
        .collect();
        EffectContext::new("", bindings)
    }

    fn apply(engine: &mut SocialEngine, effect: &str) -> Result<()> {
        let instance = engine
            .effect_library()
            .create_instance(engine, &ctx(), effect)?;
        instance.apply(engine)
    }

    #[test]
    fn test_defaults_registered() {
        let library = EffectLibrary::with_defaults();
        for name in [
            "AddAgentTrait",
            "RemoveAgentTrait",
            "AddRelationshipTrait",
            "RemoveRelationshipTrait",
            "AddAgentStatBuff",
            "IncrementAgentBaseStat",
            "IncreaseRelationshipStat",
            "AddRelationshipStatBuff",
        ] {
            assert!(library.has_effect_factory(name), "{} missing", name);
        }
    }

    #[test]
    fn test_stat_effects() {
        let mut engine = engine();

        apply(&mut engine, "AddAgentStatBuff ?target Confidence 5 2").unwrap();
        apply(&mut engine, "IncrementAgentBaseStat ?target Confidence 3").unwrap();
        apply(&mut engine, "IncreaseRelationshipStat ?initiator ?target Friendship 7").unwrap();
        apply(&mut engine, "AddRelationshipStatBuff ?initiator ?target Friendship 2").unwrap();

        let jordan = engine.agent("jordan").unwrap();
        assert_eq!(jordan.stats().stat("Confidence").unwrap().value(), 8.0);

        let relationship = engine.relationship("astrid", "jordan").unwrap();
        assert_eq!(relationship.stats().stat("Friendship").unwrap().value(), 9.0);

        engine.tick().unwrap();
        engine.tick().unwrap();
        let jordan = engine.agent("jordan").unwrap();
        assert_eq!(jordan.stats().stat("Confidence").unwrap().value(), 3.0);
    }

    #[test]
    fn test_argument_errors() {
        let mut engine = engine();

        assert!(matches!(
            apply(&mut engine, "AddAgentTrait ?target"),
            Err(SocialEngineError::EffectArgument { .. })
        ));
        assert!(matches!(
            apply(&mut engine, "AddAgentStatBuff ?target Confidence lots"),
            Err(SocialEngineError::EffectArgument { .. })
        ));
        assert!(matches!(
            apply(&mut engine, "IncrementAgentBaseStat ?bystander Confidence 1"),
            Err(SocialEngineError::UnboundVariable { .. })
        ));
        assert!(matches!(
            apply(&mut engine, "IncreaseRelationshipStat ?target ?initiator Friendship 1"),
            Err(SocialEngineError::RelationshipNotFound { .. })
        ));
        assert!(matches!(
            apply(&mut engine, "RemoveAgentTrait nobody shy"),
            Err(SocialEngineError::AgentNotFound { .. })
        ));
    }
}
