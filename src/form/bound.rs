use indexmap::IndexMap;

/// Which of a subscriber's limits a bound variable drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundRole {
    Min,
    Max,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Subscription {
    pub field: usize,
    pub role: BoundRole,
}

/// A pending delivery of a new bound value to one subscriber.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundNotice {
    pub field: usize,
    pub role: BoundRole,
    pub value: f64,
}

/// A shared numeric value linking the valid range of two fields.
#[derive(Debug, Clone, Default)]
pub struct BoundVar {
    value: Option<f64>,
    subscribers: Vec<Subscription>,
}

impl BoundVar {
    pub fn value(&self) -> Option<f64> {
        self.value
    }

    pub fn subscribers(&self) -> &[Subscription] {
        &self.subscribers
    }
}

/// Named bound variables and their subscribers, owned by the record form.
#[derive(Debug, Clone, Default)]
pub struct BoundRegistry {
    vars: IndexMap<String, BoundVar>,
}

impl BoundRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, name: &str, field: usize, role: BoundRole) {
        self.vars
            .entry(name.to_string())
            .or_default()
            .subscribers
            .push(Subscription { field, role });
    }

    /// Make sure a publish-only variable exists even without subscribers.
    pub fn declare(&mut self, name: &str) {
        self.vars.entry(name.to_string()).or_default();
    }

    pub fn get(&self, name: &str) -> Option<&BoundVar> {
        self.vars.get(name)
    }

    pub fn value(&self, name: &str) -> Option<f64> {
        self.vars.get(name).and_then(BoundVar::value)
    }

    /// Store a new value; subscribers are notified only when it changed.
    pub fn publish(&mut self, name: &str, value: f64) -> Vec<BoundNotice> {
        let Some(var) = self.vars.get_mut(name) else {
            return Vec::new();
        };
        if var.value == Some(value) {
            return Vec::new();
        }
        var.value = Some(value);
        var.subscribers
            .iter()
            .map(|sub| BoundNotice {
                field: sub.field,
                role: sub.role,
                value,
            })
            .collect()
    }

    /// Forget every published value; subscriptions stay in place.
    pub fn clear(&mut self) {
        for var in self.vars.values_mut() {
            var.value = None;
        }
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn publish_notifies_every_subscriber() {
        let mut registry = BoundRegistry::new();
        registry.subscribe("min_height", 14, BoundRole::Min);
        registry.subscribe("min_height", 15, BoundRole::Min);

        let notices = registry.publish("min_height", 12.5);
        assert_eq!(notices.len(), 2);
        assert!(notices.iter().all(|n| n.role == BoundRole::Min && n.value == 12.5));
        assert_eq!(registry.value("min_height"), Some(12.5));
    }

    #[test]
    fn unchanged_value_is_not_redelivered() {
        let mut registry = BoundRegistry::new();
        registry.subscribe("max_height", 13, BoundRole::Max);
        assert_eq!(registry.publish("max_height", 40.0).len(), 1);
        assert!(registry.publish("max_height", 40.0).is_empty());
        assert_eq!(registry.publish("max_height", 41.0).len(), 1);
    }

    #[test]
    fn unknown_variable_is_ignored() {
        let mut registry = BoundRegistry::new();
        assert!(registry.publish("nope", 1.0).is_empty());
        assert!(registry.is_empty());
    }

    #[test]
    fn clear_keeps_subscriptions() {
        let mut registry = BoundRegistry::new();
        registry.subscribe("max_height", 13, BoundRole::Max);
        registry.publish("max_height", 40.0);
        registry.clear();
        assert_eq!(registry.value("max_height"), None);
        assert_eq!(registry.get("max_height").map(|v| v.subscribers().len()), Some(1));
        assert_eq!(registry.publish("max_height", 40.0).len(), 1);
    }
}
