use std::cell::Cell;
use std::rc::Rc;

/// Call-site sentinel shared between the coordinator and the engine's
/// wrapped emphasis setter.
///
/// The engine consults `is_authorized` on every emphasis change; only code
/// running inside `authorize` sees `true`. Cloning shares the same flag.
#[derive(Debug, Clone, Default)]
pub struct EmphasisGate {
    authorized: Rc<Cell<bool>>,
}

impl EmphasisGate {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_authorized(&self) -> bool {
        self.authorized.get()
    }

    /// Runs `apply` with the gate open; restores the previous flag afterwards.
    pub fn authorize<T>(&self, apply: impl FnOnce() -> T) -> T {
        let previous = self.authorized.replace(true);
        let result = apply();
        self.authorized.set(previous);
        result
    }

    #[must_use]
    pub fn shares_flag_with(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.authorized, &other.authorized)
    }
}

#[cfg(test)]
mod tests {
    use super::EmphasisGate;

    #[test]
    fn gate_is_open_only_inside_authorize() {
        let gate = EmphasisGate::new();
        let engine_side = gate.clone();
        assert!(!engine_side.is_authorized());

        let seen = gate.authorize(|| engine_side.is_authorized());
        assert!(seen);
        assert!(!engine_side.is_authorized());
        assert!(gate.shares_flag_with(&engine_side));
    }

    #[test]
    fn nested_authorize_restores_outer_state() {
        let gate = EmphasisGate::new();
        gate.authorize(|| {
            gate.authorize(|| assert!(gate.is_authorized()));
            assert!(gate.is_authorized());
        });
        assert!(!gate.is_authorized());
    }
}
