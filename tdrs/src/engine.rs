//! The social engine - owns the fact database, libraries, agents and relationships.

use repraxis::{DBQuery, FactDatabase, RawBindings, Value};
use std::collections::BTreeMap;
use tracing::{debug, info, trace};

use crate::entities::{
    ActiveSocialRuleEntry, Agent, AgentSchema, ModifierDirection, Relationship,
    RelationshipModifier, RelationshipSchema,
};
use crate::error::{Result, SocialEngineError};
use crate::events::{event_symbol, EffectContext, EffectLibrary, SocialEvent, SocialEventLibrary};
use crate::rules::{SocialRule, SocialRuleLibrary};
use crate::stats::{ModifierId, ModifierSource, Stat, StatManager, StatModifierData, StatSchema};
use crate::traits::{Trait, TraitLibrary, TraitType};

/// Owner uid to target uid to relationship.
type RelationshipMap = BTreeMap<String, BTreeMap<String, Relationship>>;

/// The simulation.
///
/// Entities refer to each other by uid, and every cross-entity change goes
/// through the engine so facts, modifiers and active rules stay consistent.
#[derive(Debug)]
pub struct SocialEngine {
    db: FactDatabase,
    trait_library: TraitLibrary,
    social_rules: SocialRuleLibrary,
    effect_library: EffectLibrary,
    social_event_library: SocialEventLibrary,
    agents: BTreeMap<String, Agent>,
    relationships: RelationshipMap,
    agent_schemas: BTreeMap<String, AgentSchema>,
    relationship_schemas: BTreeMap<String, BTreeMap<String, RelationshipSchema>>,
}

impl SocialEngine {
    /// Create an empty engine with the built-in effects registered.
    pub fn new() -> Self {
        Self {
            db: FactDatabase::new(),
            trait_library: TraitLibrary::new(),
            social_rules: SocialRuleLibrary::new(),
            effect_library: EffectLibrary::with_defaults(),
            social_event_library: SocialEventLibrary::new(),
            agents: BTreeMap::new(),
            relationships: BTreeMap::new(),
            agent_schemas: BTreeMap::new(),
            relationship_schemas: BTreeMap::new(),
        }
    }

    pub fn db(&self) -> &FactDatabase {
        &self.db
    }

    pub fn db_mut(&mut self) -> &mut FactDatabase {
        &mut self.db
    }

    pub fn trait_library(&self) -> &TraitLibrary {
        &self.trait_library
    }

    pub fn trait_library_mut(&mut self) -> &mut TraitLibrary {
        &mut self.trait_library
    }

    pub fn social_rules(&self) -> &SocialRuleLibrary {
        &self.social_rules
    }

    pub fn social_rules_mut(&mut self) -> &mut SocialRuleLibrary {
        &mut self.social_rules
    }

    pub fn effect_library(&self) -> &EffectLibrary {
        &self.effect_library
    }

    pub fn effect_library_mut(&mut self) -> &mut EffectLibrary {
        &mut self.effect_library
    }

    pub fn social_event_library(&self) -> &SocialEventLibrary {
        &self.social_event_library
    }

    pub fn social_event_library_mut(&mut self) -> &mut SocialEventLibrary {
        &mut self.social_event_library
    }

    pub fn add_trait(&mut self, definition: Trait) {
        self.trait_library.add_trait(definition);
    }

    pub fn add_social_rule(&mut self, rule: SocialRule) {
        self.social_rules.add_rule(rule);
    }

    pub fn add_social_event(&mut self, event: SocialEvent) {
        self.social_event_library.add_event(event);
    }

    // ========================================================================
    // Schemas
    // ========================================================================

    pub fn add_agent_schema(&mut self, schema: AgentSchema) {
        self.agent_schemas.insert(schema.agent_type.clone(), schema);
    }

    pub fn agent_schema(&self, agent_type: &str) -> Result<&AgentSchema> {
        self.agent_schemas
            .get(agent_type)
            .ok_or_else(|| SocialEngineError::AgentSchemaNotFound {
                agent_type: agent_type.to_string(),
            })
    }

    pub fn add_relationship_schema(&mut self, schema: RelationshipSchema) {
        self.relationship_schemas
            .entry(schema.owner_type.clone())
            .or_default()
            .insert(schema.target_type.clone(), schema);
    }

    pub fn relationship_schema(
        &self,
        owner_type: &str,
        target_type: &str,
    ) -> Result<&RelationshipSchema> {
        self.relationship_schemas
            .get(owner_type)
            .and_then(|targets| targets.get(target_type))
            .ok_or_else(|| SocialEngineError::RelationshipSchemaNotFound {
                owner_type: owner_type.to_string(),
                target_type: target_type.to_string(),
            })
    }

    // ========================================================================
    // Agents
    // ========================================================================

    /// Create an agent from the schema for its type.
    pub fn add_agent(&mut self, agent_type: &str, uid: &str) -> Result<&Agent> {
        let schema = self.agent_schema(agent_type)?.clone();

        if self.agents.contains_key(uid) {
            return Err(SocialEngineError::DuplicateAgent {
                uid: uid.to_string(),
            });
        }

        self.db.insert(uid)?;

        let mut agent = Agent::new(uid, agent_type);
        add_schema_stats(agent.stats_mut(), &schema.stats);
        self.agents.insert(uid.to_string(), agent);

        for trait_id in &schema.traits {
            self.add_agent_trait(uid, trait_id, -1, None)?;
        }

        info!(uid, agent_type, "agent added");
        self.agent(uid)
    }

    pub fn agent(&self, uid: &str) -> Result<&Agent> {
        self.agents
            .get(uid)
            .ok_or_else(|| SocialEngineError::AgentNotFound {
                uid: uid.to_string(),
            })
    }

    pub fn agent_mut(&mut self, uid: &str) -> Result<&mut Agent> {
        agent_entry_mut(&mut self.agents, uid)
    }

    pub fn has_agent(&self, uid: &str) -> bool {
        self.agents.contains_key(uid)
    }

    /// Iterate over agents in uid order.
    pub fn agents(&self) -> impl Iterator<Item = &Agent> {
        self.agents.values()
    }

    /// Remove an agent along with every relationship it takes part in.
    pub fn remove_agent(&mut self, uid: &str) -> Result<bool> {
        let Some(agent) = self.agents.get(uid) else {
            return Ok(false);
        };

        let outgoing: Vec<String> = agent.outgoing_relationships().map(str::to_string).collect();
        let incoming: Vec<String> = agent.incoming_relationships().map(str::to_string).collect();

        for target in &outgoing {
            self.remove_relationship(uid, target)?;
        }
        for owner in &incoming {
            self.remove_relationship(owner, uid)?;
        }

        self.db.delete(uid)?;
        self.agents.remove(uid);
        info!(uid, "agent removed");

        // Rules elsewhere may have depended on the removed facts.
        self.reevaluate_relationships()?;
        Ok(true)
    }

    // ========================================================================
    // Relationships
    // ========================================================================

    /// Create a relationship from `owner` to `target`.
    pub fn add_relationship(&mut self, owner: &str, target: &str) -> Result<&Relationship> {
        let owner_type = self.agent(owner)?.agent_type().to_string();
        let target_type = self.agent(target)?.agent_type().to_string();
        let schema = self.relationship_schema(&owner_type, &target_type)?.clone();

        if self.has_relationship(owner, target) {
            return Err(SocialEngineError::DuplicateRelationship {
                owner: owner.to_string(),
                target: target.to_string(),
            });
        }

        self.db.insert(&relationship_fact(owner, target))?;

        let mut relationship = Relationship::new(owner, target);
        add_schema_stats(relationship.stats_mut(), &schema.stats);
        self.relationships
            .entry(owner.to_string())
            .or_default()
            .insert(target.to_string(), relationship);

        agent_entry_mut(&mut self.agents, owner)?.link_outgoing(target);
        agent_entry_mut(&mut self.agents, target)?.link_incoming(owner);

        for trait_id in &schema.traits {
            self.add_relationship_trait(owner, target, trait_id, -1, None)?;
        }

        self.reevaluate_social_rules(owner, target)?;

        info!(owner, target, "relationship added");
        self.relationship(owner, target)
    }

    pub fn relationship(&self, owner: &str, target: &str) -> Result<&Relationship> {
        self.relationships
            .get(owner)
            .and_then(|targets| targets.get(target))
            .ok_or_else(|| SocialEngineError::RelationshipNotFound {
                owner: owner.to_string(),
                target: target.to_string(),
            })
    }

    pub fn relationship_mut(&mut self, owner: &str, target: &str) -> Result<&mut Relationship> {
        relationship_entry_mut(&mut self.relationships, owner, target)
    }

    pub fn has_relationship(&self, owner: &str, target: &str) -> bool {
        self.relationships
            .get(owner)
            .is_some_and(|targets| targets.contains_key(target))
    }

    /// Iterate over relationships ordered by owner, then target.
    pub fn relationships(&self) -> impl Iterator<Item = &Relationship> {
        self.relationships.values().flat_map(|targets| targets.values())
    }

    /// Remove the relationship from `owner` to `target`. The reverse
    /// relationship is untouched.
    pub fn remove_relationship(&mut self, owner: &str, target: &str) -> Result<bool> {
        let Some(targets) = self.relationships.get_mut(owner) else {
            return Ok(false);
        };
        if targets.remove(target).is_none() {
            return Ok(false);
        }
        if targets.is_empty() {
            self.relationships.remove(owner);
        }

        if let Some(agent) = self.agents.get_mut(owner) {
            agent.unlink_outgoing(target);
        }
        if let Some(agent) = self.agents.get_mut(target) {
            agent.unlink_incoming(owner);
        }

        retract(&mut self.db, &relationship_fact(owner, target))?;
        info!(owner, target, "relationship removed");
        Ok(true)
    }

    fn relationship_pairs(&self) -> Vec<(String, String)> {
        self.relationships()
            .map(|r| (r.owner().to_string(), r.target().to_string()))
            .collect()
    }

    // ========================================================================
    // Traits
    // ========================================================================

    /// Add a trait to an agent.
    ///
    /// Returns false if the agent already has the trait or a conflicting one.
    /// A negative duration makes the trait permanent.
    pub fn add_agent_trait(
        &mut self,
        uid: &str,
        trait_id: &str,
        duration: i32,
        description_override: Option<&str>,
    ) -> Result<bool> {
        let definition = self.trait_library.get_trait(trait_id)?.clone();
        if definition.trait_type != TraitType::Agent {
            return Err(SocialEngineError::TraitTypeMismatch {
                trait_id: trait_id.to_string(),
                expected: TraitType::Agent,
            });
        }

        let agent = agent_entry_mut(&mut self.agents, uid)?;
        if !agent.traits().can_add_trait(&definition) {
            return Ok(false);
        }
        check_modifier_stats(agent.stats(), &definition.modifiers)?;

        let description = match description_override.filter(|d| !d.is_empty()) {
            Some(description) => description.to_string(),
            None => definition.description.replace("[owner]", uid),
        };

        self.db.insert(&agent_trait_fact(uid, trait_id))?;
        agent
            .traits_mut()
            .add_trait(&definition, &description, duration);
        apply_modifiers(
            agent.stats_mut(),
            &definition.modifiers,
            &ModifierSource::Trait(definition.trait_id.clone()),
        )?;
        debug!(uid, trait_id, duration, "agent trait added");

        self.reevaluate_agent_relationships(uid)?;
        Ok(true)
    }

    /// Remove a trait from an agent. Returns false if it was not held.
    pub fn remove_agent_trait(&mut self, uid: &str, trait_id: &str) -> Result<bool> {
        let agent = agent_entry_mut(&mut self.agents, uid)?;
        if agent.traits_mut().remove_trait(trait_id).is_none() {
            return Ok(false);
        }
        agent
            .stats_mut()
            .remove_modifiers_from_source(&ModifierSource::Trait(trait_id.to_string()));

        retract(&mut self.db, &agent_trait_fact(uid, trait_id))?;
        debug!(uid, trait_id, "agent trait removed");

        self.reevaluate_agent_relationships(uid)?;
        Ok(true)
    }

    /// Add a trait to a relationship.
    ///
    /// Returns false if the relationship already has the trait or a
    /// conflicting one.
    pub fn add_relationship_trait(
        &mut self,
        owner: &str,
        target: &str,
        trait_id: &str,
        duration: i32,
        description_override: Option<&str>,
    ) -> Result<bool> {
        let definition = self.trait_library.get_trait(trait_id)?.clone();
        if definition.trait_type != TraitType::Relationship {
            return Err(SocialEngineError::TraitTypeMismatch {
                trait_id: trait_id.to_string(),
                expected: TraitType::Relationship,
            });
        }

        let relationship = relationship_entry_mut(&mut self.relationships, owner, target)?;
        if !relationship.traits().can_add_trait(&definition) {
            return Ok(false);
        }
        check_modifier_stats(relationship.stats(), &definition.modifiers)?;

        let description = match description_override.filter(|d| !d.is_empty()) {
            Some(description) => description.to_string(),
            None => relationship.render_description(&definition.description),
        };

        self.db
            .insert(&relationship_trait_fact(owner, target, trait_id))?;
        relationship
            .traits_mut()
            .add_trait(&definition, &description, duration);
        apply_modifiers(
            relationship.stats_mut(),
            &definition.modifiers,
            &ModifierSource::Trait(definition.trait_id.clone()),
        )?;
        debug!(owner, target, trait_id, duration, "relationship trait added");

        self.reevaluate_social_rules(owner, target)?;
        Ok(true)
    }

    /// Remove a trait from a relationship. Removing the relationship type
    /// trait also clears the type.
    pub fn remove_relationship_trait(
        &mut self,
        owner: &str,
        target: &str,
        trait_id: &str,
    ) -> Result<bool> {
        let relationship = relationship_entry_mut(&mut self.relationships, owner, target)?;
        if relationship.traits_mut().remove_trait(trait_id).is_none() {
            return Ok(false);
        }
        relationship
            .stats_mut()
            .remove_modifiers_from_source(&ModifierSource::Trait(trait_id.to_string()));

        if relationship.relationship_type() == Some(trait_id) {
            relationship.set_relationship_type(None);
            retract(&mut self.db, &relationship_type_fact(owner, target, trait_id))?;
        }

        retract(&mut self.db, &relationship_trait_fact(owner, target, trait_id))?;
        debug!(owner, target, trait_id, "relationship trait removed");

        self.reevaluate_social_rules(owner, target)?;
        Ok(true)
    }

    /// Replace the relationship type, a relationship trait recorded as
    /// `owner.relationships.target.type!<trait>`.
    pub fn set_relationship_type(
        &mut self,
        owner: &str,
        target: &str,
        trait_id: &str,
    ) -> Result<bool> {
        let definition = self.trait_library.get_trait(trait_id)?;
        if definition.trait_type != TraitType::Relationship {
            return Err(SocialEngineError::TraitTypeMismatch {
                trait_id: trait_id.to_string(),
                expected: TraitType::Relationship,
            });
        }

        let previous = self
            .relationship(owner, target)?
            .relationship_type()
            .map(str::to_string);
        if let Some(previous) = previous {
            self.remove_relationship_trait(owner, target, &previous)?;
        }

        self.relationship_mut(owner, target)?
            .set_relationship_type(Some(trait_id.to_string()));
        self.db
            .insert(&relationship_type_fact(owner, target, trait_id))?;

        self.add_relationship_trait(owner, target, trait_id, -1, None)
    }

    // ========================================================================
    // Relationship modifiers
    // ========================================================================

    /// Attach a relationship modifier to an agent.
    pub fn add_relationship_modifier(
        &mut self,
        uid: &str,
        modifier: RelationshipModifier,
    ) -> Result<ModifierId> {
        let id = modifier.id;
        self.agent_mut(uid)?.add_relationship_modifier(modifier);
        self.reevaluate_agent_relationships(uid)?;
        Ok(id)
    }

    /// Detach a relationship modifier from an agent.
    pub fn remove_relationship_modifier(&mut self, uid: &str, id: ModifierId) -> Result<bool> {
        if !self.agent_mut(uid)?.remove_relationship_modifier(id) {
            return Ok(false);
        }
        self.reevaluate_agent_relationships(uid)?;
        Ok(true)
    }

    // ========================================================================
    // Evaluation
    // ========================================================================

    /// Recompute which social rules and relationship modifiers apply to a
    /// relationship.
    pub fn reevaluate_social_rules(&mut self, owner: &str, target: &str) -> Result<()> {
        let relationship = relationship_entry_mut(&mut self.relationships, owner, target)?;

        let (previous_rules, previous_modifiers) = relationship.take_active();
        for entry in previous_rules {
            relationship
                .stats_mut()
                .remove_modifiers_from_source(&ModifierSource::SocialRule(entry.rule_id));
        }
        for id in previous_modifiers {
            relationship
                .stats_mut()
                .remove_modifiers_from_source(&ModifierSource::RelationshipModifier(id));
        }

        let bindings = [relationship_bindings(owner, target)];

        for rule in self.social_rules.iter() {
            if !rule.query().run_with_bindings(&self.db, &bindings)?.success() {
                continue;
            }

            // Every applied modifier must be recorded as active, or the next
            // pass cannot remove it.
            check_modifier_stats(relationship.stats(), &rule.modifiers)?;
            apply_modifiers(
                relationship.stats_mut(),
                &rule.modifiers,
                &ModifierSource::SocialRule(rule.rule_id.clone()),
            )?;
            let description = relationship.render_description(&rule.description);
            relationship.push_active_rule(ActiveSocialRuleEntry {
                rule_id: rule.rule_id.clone(),
                description,
            });
            trace!(owner, target, rule = rule.rule_id.as_str(), "social rule active");
        }

        let outgoing = self
            .agents
            .get(owner)
            .into_iter()
            .flat_map(|agent| agent.relationship_modifiers())
            .filter(|m| m.direction == ModifierDirection::Outgoing);
        let incoming = self
            .agents
            .get(target)
            .into_iter()
            .flat_map(|agent| agent.relationship_modifiers())
            .filter(|m| m.direction == ModifierDirection::Incoming);

        for modifier in outgoing.chain(incoming) {
            let query = DBQuery::from_clauses(modifier.preconditions.iter().cloned());
            if !query.run_with_bindings(&self.db, &bindings)?.success() {
                continue;
            }

            check_modifier_stats(relationship.stats(), &modifier.modifiers)?;
            apply_modifiers(
                relationship.stats_mut(),
                &modifier.modifiers,
                &ModifierSource::RelationshipModifier(modifier.id),
            )?;
            relationship.push_active_modifier(modifier.id);
        }

        Ok(())
    }

    /// Re-evaluate every relationship an agent owns or is targeted by.
    pub fn reevaluate_agent_relationships(&mut self, uid: &str) -> Result<()> {
        let agent = self.agent(uid)?;
        let pairs: Vec<(String, String)> = agent
            .outgoing_relationships()
            .map(|target| (uid.to_string(), target.to_string()))
            .chain(
                agent
                    .incoming_relationships()
                    .map(|owner| (owner.to_string(), uid.to_string())),
            )
            .collect();

        for (owner, target) in pairs {
            self.reevaluate_social_rules(&owner, &target)?;
        }
        Ok(())
    }

    /// Re-evaluate every relationship in the engine.
    pub fn reevaluate_relationships(&mut self) -> Result<()> {
        for (owner, target) in self.relationship_pairs() {
            self.reevaluate_social_rules(&owner, &target)?;
        }
        Ok(())
    }

    // ========================================================================
    // Events
    // ========================================================================

    /// Dispatch a social event with agents bound to its roles in order.
    pub fn dispatch_event(&mut self, event_name: &str, agents: &[&str]) -> Result<()> {
        let event = self
            .social_event_library
            .get_event(&event_symbol(event_name, agents.len()))?
            .clone();

        let bindings: RawBindings = event
            .roles
            .iter()
            .zip(agents)
            .map(|(role, uid)| (role.clone(), Value::from(*uid)))
            .collect();

        let ctx = EffectContext::new(event.description.clone(), bindings.clone());
        info!(event = event_name, agents = ?agents, "dispatching event");

        for response in &event.responses {
            let query = DBQuery::from_clauses(response.preconditions.iter().cloned());
            let results = query.run_with_bindings(&self.db, std::slice::from_ref(&bindings))?;
            if !results.success() {
                continue;
            }

            let scopes: Vec<EffectContext> = if results.is_empty() {
                vec![ctx.clone()]
            } else {
                results
                    .bindings()
                    .iter()
                    .map(|binding_set| ctx.with_bindings(binding_set))
                    .collect()
            };

            for scope in scopes {
                let scope = if response.description.is_empty() {
                    scope
                } else {
                    scope.with_description_template(response.description.clone())
                };

                self.apply_effects(&scope, &response.effects)
                    .map_err(|source| SocialEngineError::EventEffect {
                        event: event_name.to_string(),
                        source: Box::new(source),
                    })?;
            }
        }

        Ok(())
    }

    /// Instantiate every effect before applying any of them.
    fn apply_effects(&mut self, ctx: &EffectContext, effects: &[String]) -> Result<()> {
        let engine: &SocialEngine = self;
        let instances = effects
            .iter()
            .map(|effect| engine.effect_library.create_instance(engine, ctx, effect))
            .collect::<Result<Vec<_>>>()?;

        for instance in instances {
            instance.apply(self)?;
        }
        Ok(())
    }

    // ========================================================================
    // Time
    // ========================================================================

    /// Advance the simulation one step.
    pub fn tick(&mut self) -> Result<()> {
        let uids: Vec<String> = self.agents.keys().cloned().collect();
        for uid in &uids {
            let Some(agent) = self.agents.get_mut(uid) else {
                continue;
            };

            let expired = agent.traits_mut().tick();
            agent.stats_mut().tick_modifiers();
            agent.tick_relationship_modifiers();

            for trait_id in expired {
                debug!(uid = uid.as_str(), trait_id = trait_id.as_str(), "agent trait expired");
                self.remove_agent_trait(uid, &trait_id)?;
            }

            self.reevaluate_agent_relationships(uid)?;
        }

        for (owner, target) in self.relationship_pairs() {
            let relationship = relationship_entry_mut(&mut self.relationships, &owner, &target)?;

            let expired = relationship.traits_mut().tick();
            relationship.stats_mut().tick_modifiers();

            for trait_id in expired {
                debug!(
                    owner = owner.as_str(),
                    target = target.as_str(),
                    trait_id = trait_id.as_str(),
                    "relationship trait expired"
                );
                self.remove_relationship_trait(&owner, &target, &trait_id)?;
            }

            self.reevaluate_social_rules(&owner, &target)?;
        }

        Ok(())
    }

    /// Remove every agent, relationship and fact. Libraries and schemas stay.
    pub fn reset(&mut self) {
        self.agents.clear();
        self.relationships.clear();
        self.db.clear();
        info!("engine reset");
    }
}

impl Default for SocialEngine {
    fn default() -> Self {
        Self::new()
    }
}

fn agent_entry_mut<'a>(agents: &'a mut BTreeMap<String, Agent>, uid: &str) -> Result<&'a mut Agent> {
    agents
        .get_mut(uid)
        .ok_or_else(|| SocialEngineError::AgentNotFound {
            uid: uid.to_string(),
        })
}

fn relationship_entry_mut<'a>(
    relationships: &'a mut RelationshipMap,
    owner: &str,
    target: &str,
) -> Result<&'a mut Relationship> {
    relationships
        .get_mut(owner)
        .and_then(|targets| targets.get_mut(target))
        .ok_or_else(|| SocialEngineError::RelationshipNotFound {
            owner: owner.to_string(),
            target: target.to_string(),
        })
}

fn add_schema_stats(stats: &mut StatManager, schema: &[StatSchema]) {
    for entry in schema {
        stats.add_stat(entry.stat.clone(), Stat::from_schema(entry));
    }
}

/// Fail before mutating anything if a modifier targets a missing stat.
fn check_modifier_stats(stats: &StatManager, modifiers: &[StatModifierData]) -> Result<()> {
    for modifier in modifiers {
        stats.stat(&modifier.stat)?;
    }
    Ok(())
}

fn apply_modifiers(
    stats: &mut StatManager,
    modifiers: &[StatModifierData],
    source: &ModifierSource,
) -> Result<()> {
    for data in modifiers {
        stats
            .stat_mut(&data.stat)?
            .add_modifier(data.to_modifier().with_source(source.clone()));
    }
    Ok(())
}

/// Delete a fact if it is present.
fn retract(db: &mut FactDatabase, sentence: &str) -> Result<bool> {
    if !db.assert(sentence)? {
        return Ok(false);
    }
    Ok(db.delete(sentence)?)
}

fn relationship_bindings(owner: &str, target: &str) -> RawBindings {
    [
        ("?owner".to_string(), Value::from(owner)),
        ("?target".to_string(), Value::from(target)),
    ]
    .into_iter()
    .collect()
}

fn agent_trait_fact(uid: &str, trait_id: &str) -> String {
    format!("{}.traits.{}", uid, trait_id)
}

fn relationship_fact(owner: &str, target: &str) -> String {
    format!("{}.relationships.{}", owner, target)
}

fn relationship_trait_fact(owner: &str, target: &str, trait_id: &str) -> String {
    format!("{}.relationships.{}.traits.{}", owner, target, trait_id)
}

fn relationship_type_fact(owner: &str, target: &str, trait_id: &str) -> String {
    format!("{}.relationships.{}.type!{}", owner, target, trait_id)
}
