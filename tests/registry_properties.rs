//! Property tests for write validation in the variable registry.

#![allow(clippy::panic)]

use proptest::prelude::*;

use varctl_gateway::domain::{VarValue, Variable, VariableRegistry};

const GAIN: usize = 0;
const COUNT: usize = 1;
const LABEL: usize = 2;
const LEVEL: usize = 3;

/// `gain` FLOAT in `[min, max]`, `count` INT unbounded, `label` STRING,
/// `level` INT in `[lo, hi]`.
fn registry(min: f64, max: f64, lo: i64, hi: i64) -> VariableRegistry {
    let Ok(gain) = Variable::float("gain", min).with_limits(min, max) else {
        panic!("limits [{min}, {max}] must be valid");
    };
    let Ok(level) = Variable::int("level", lo).with_limits(lo as f64, hi as f64) else {
        panic!("limits [{lo}, {hi}] must be valid");
    };
    let vars = vec![
        gain,
        Variable::int("count", 0),
        Variable::text("label", ""),
        level,
    ];
    let Ok(registry) = VariableRegistry::new(vars) else {
        panic!("non-empty registry");
    };
    registry
}

fn stored(reg: &VariableRegistry, index: usize) -> Option<VarValue> {
    reg.get(index).map(|v| v.value().clone())
}

proptest! {
    #[test]
    fn float_writes_respect_limits(
        min in -1000.0f64..0.0,
        span in 0.0f64..1000.0,
        candidate in -3000.0f64..3000.0,
    ) {
        let max = min + span;
        let mut reg = registry(min, max, 0, 1);
        let accepted = reg.set(GAIN, VarValue::Float(candidate)).is_ok();
        if (min..=max).contains(&candidate) {
            prop_assert!(accepted);
            prop_assert_eq!(stored(&reg, GAIN), Some(VarValue::Float(candidate)));
        } else {
            prop_assert!(!accepted);
            prop_assert_eq!(stored(&reg, GAIN), Some(VarValue::Float(min)));
        }
    }

    #[test]
    fn integer_writes_respect_limits(
        lo in -10_000i64..0,
        span in 0i64..10_000,
        whole in -30_000i64..30_000,
        frac in prop_oneof![Just(0.0f64), 0.01f64..0.99],
    ) {
        let hi = lo + span;
        let mut reg = registry(0.0, 1.0, lo, hi);
        let candidate = whole as f64 + frac;
        let accepted = reg.set(LEVEL, VarValue::Float(candidate)).is_ok();
        if frac == 0.0 && (lo..=hi).contains(&whole) {
            prop_assert!(accepted);
            prop_assert_eq!(stored(&reg, LEVEL), Some(VarValue::Int(whole)));
        } else {
            prop_assert!(!accepted);
            prop_assert_eq!(stored(&reg, LEVEL), Some(VarValue::Int(lo)));
        }
    }

    #[test]
    fn integer_rejects_fractional_floats(whole in -1_000_000i64..1_000_000, frac in 0.01f64..0.99) {
        let mut reg = registry(0.0, 1.0, 0, 1);
        prop_assert!(reg.set(COUNT, VarValue::Float(whole as f64 + frac)).is_err());
        prop_assert_eq!(stored(&reg, COUNT), Some(VarValue::Int(0)));

        prop_assert!(reg.set(COUNT, VarValue::Float(whole as f64)).is_ok());
        prop_assert_eq!(stored(&reg, COUNT), Some(VarValue::Int(whole)));
    }

    #[test]
    fn text_accepts_any_string_but_no_numbers(s in ".*", n in any::<i64>()) {
        let mut reg = registry(0.0, 1.0, 0, 1);
        prop_assert!(reg.set(LABEL, VarValue::Text(s.clone())).is_ok());
        prop_assert!(reg.set(LABEL, VarValue::Int(n)).is_err());
        prop_assert_eq!(stored(&reg, LABEL), Some(VarValue::Text(s)));
    }

    #[test]
    fn out_of_bounds_index_never_writes(index in 4usize..1000, n in any::<i64>()) {
        let mut reg = registry(0.0, 1.0, 0, 1);
        prop_assert!(reg.set(index, VarValue::Int(n)).is_err());
        prop_assert_eq!(stored(&reg, COUNT), Some(VarValue::Int(0)));
    }
}
