//! Effects - parameterized actions instantiated from strings like
//! `AddAgentTrait ?target recently-complimented 3`.

use repraxis::{RawBindings, Value};
use std::collections::BTreeMap;
use std::fmt;

use crate::engine::SocialEngine;
use crate::error::{Result, SocialEngineError};

/// Bindings and description in scope while instantiating effects.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EffectContext {
    description_template: String,
    bindings: RawBindings,
}

impl EffectContext {
    /// Create a new context.
    pub fn new(description_template: impl Into<String>, bindings: RawBindings) -> Self {
        Self {
            description_template: description_template.into(),
            bindings,
        }
    }

    pub fn bindings(&self) -> &RawBindings {
        &self.bindings
    }

    pub fn description_template(&self) -> &str {
        &self.description_template
    }

    /// The template with each `[name]` replaced by the value bound to `?name`.
    pub fn description(&self) -> String {
        let mut description = self.description_template.clone();
        for (key, value) in &self.bindings {
            let name = key.strip_prefix('?').unwrap_or(key);
            description = description.replace(&format!("[{}]", name), &value.to_string());
        }
        description
    }

    /// A copy of this context with additional bindings layered on top.
    pub fn with_bindings(&self, bindings: &RawBindings) -> EffectContext {
        let mut merged = self.bindings.clone();
        merged.extend(bindings.iter().map(|(k, v)| (k.clone(), v.clone())));
        EffectContext::new(self.description_template.clone(), merged)
    }

    pub fn with_description_template(mut self, template: impl Into<String>) -> Self {
        self.description_template = template.into();
        self
    }

    /// Resolve an effect argument to a uid.
    ///
    /// Variables are looked up in the bindings. Anything else is taken literally.
    pub fn resolve_uid(&self, arg: &str) -> Result<String> {
        if !arg.starts_with('?') {
            return Ok(arg.to_string());
        }

        self.bindings
            .get(arg)
            .map(Value::to_string)
            .ok_or_else(|| SocialEngineError::UnboundVariable {
                variable: arg.to_string(),
            })
    }
}

/// An instantiated effect, ready to apply.
pub trait Effect {
    fn apply(&self, engine: &mut SocialEngine) -> Result<()>;
}

/// Creates effects of one kind from their string arguments.
pub trait EffectFactory {
    /// Name used as the first word of effect strings.
    fn effect_name(&self) -> &str;

    /// Validate the arguments and build an effect.
    fn create_instance(
        &self,
        engine: &SocialEngine,
        ctx: &EffectContext,
        args: &[&str],
    ) -> Result<Box<dyn Effect>>;
}

/// Effect factories keyed by effect name.
#[derive(Default)]
pub struct EffectLibrary {
    factories: BTreeMap<String, Box<dyn EffectFactory>>,
}

impl EffectLibrary {
    /// Create an empty library.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a library with every built-in effect registered.
    pub fn with_defaults() -> Self {
        let mut library = Self::new();
        super::defaults::register_default_effects(&mut library);
        library
    }

    /// Register a factory, replacing any with the same name.
    pub fn add_effect_factory(&mut self, factory: impl EffectFactory + 'static) {
        self.factories
            .insert(factory.effect_name().to_string(), Box::new(factory));
    }

    pub fn get_effect_factory(&self, effect_name: &str) -> Result<&dyn EffectFactory> {
        self.factories
            .get(effect_name)
            .map(|factory| factory.as_ref())
            .ok_or_else(|| SocialEngineError::EffectFactoryNotFound {
                effect: effect_name.to_string(),
            })
    }

    pub fn has_effect_factory(&self, effect_name: &str) -> bool {
        self.factories.contains_key(effect_name)
    }

    /// Build an effect from a string such as `AddAgentTrait ?target shy 3`.
    pub fn create_instance(
        &self,
        engine: &SocialEngine,
        ctx: &EffectContext,
        effect: &str,
    ) -> Result<Box<dyn Effect>> {
        let mut parts = effect.split_whitespace();
        let name = parts.next().unwrap_or_default();
        let args: Vec<&str> = parts.collect();

        self.get_effect_factory(name)?
            .create_instance(engine, ctx, &args)
    }
}

impl fmt::Debug for EffectLibrary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EffectLibrary")
            .field("factories", &self.factories.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bindings(pairs: &[(&str, &str)]) -> RawBindings {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), Value::from(*v)))
            .collect()
    }

    #[test]
    fn test_description_fills_every_placeholder() {
        let ctx = EffectContext::new(
            "[initiator] complimented [target]. [target] blushed.",
            bindings(&[("?initiator", "astrid"), ("?target", "jordan")]),
        );
        assert_eq!(ctx.description(), "astrid complimented jordan. jordan blushed.");
    }

    #[test]
    fn test_with_bindings_layers() {
        let base = EffectContext::new("", bindings(&[("?initiator", "astrid")]));
        let scoped = base.with_bindings(&bindings(&[("?target", "jordan"), ("?initiator", "lee")]));

        assert_eq!(base.bindings().len(), 1);
        assert_eq!(scoped.bindings()["?initiator"], Value::from("lee"));
        assert_eq!(scoped.bindings()["?target"], Value::from("jordan"));
    }

    #[test]
    fn test_resolve_uid() {
        let ctx = EffectContext::new("", bindings(&[("?target", "jordan")]));
        assert_eq!(ctx.resolve_uid("?target").unwrap(), "jordan");
        assert_eq!(ctx.resolve_uid("lee").unwrap(), "lee");
        assert!(matches!(
            ctx.resolve_uid("?initiator"),
            Err(SocialEngineError::UnboundVariable { .. })
        ));
    }

    #[test]
    fn test_unknown_factory() {
        let engine = SocialEngine::new();
        let result = engine.effect_library().create_instance(
            &engine,
            &EffectContext::default(),
            "Explode ?target",
        );
        assert!(matches!(
            result,
            Err(SocialEngineError::EffectFactoryNotFound { .. })
        ));
    }
}
