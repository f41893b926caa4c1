//! Proptest generators for property-based testing.

use proptest::prelude::*;

use lotledger_core::{Direction, ItemKey};

/// Generate an item code such as `A123`.
pub fn item_code() -> impl Strategy<Value = String> {
    "[A-Z][0-9]{3}".prop_map(String::from)
}

/// Generate an item name, including non-ASCII names.
pub fn item_name() -> impl Strategy<Value = String> {
    prop_oneof![
        "[A-Z][a-z]{2,15}( [A-Za-z]{1,8})?",
        "(ボルト|ナット|ワッシャー|テスト商品)[A-C]",
    ]
    .prop_map(String::from)
}

/// Generate a lot number such as `LOT042`.
pub fn lot_number() -> impl Strategy<Value = String> {
    "LOT[0-9]{1,3}".prop_map(String::from)
}

/// Generate a complete item key.
pub fn item_key() -> impl Strategy<Value = ItemKey> {
    (item_code(), item_name(), lot_number())
        .prop_map(|(code, name, lot)| ItemKey::new(code, name, lot))
}

/// Generate a movement direction.
pub fn direction() -> impl Strategy<Value = Direction> {
    prop_oneof![Just(Direction::Inbound), Just(Direction::Outbound)]
}

/// Generate a valid movement amount.
pub fn amount() -> impl Strategy<Value = i64> {
    1i64..=1_000
}

/// A sequence of movements against one record.
#[derive(Debug, Clone)]
pub struct MovementPlan {
    pub steps: Vec<(Direction, i64)>,
}

impl MovementPlan {
    /// Sum of the signed deltas of every step.
    pub fn net(&self) -> i64 {
        self.steps
            .iter()
            .map(|(direction, amount)| direction.signed(*amount))
            .sum()
    }

    /// Lowest running quantity reached, starting from zero.
    pub fn low_water_mark(&self) -> i64 {
        self.steps
            .iter()
            .scan(0i64, |running, (direction, amount)| {
                *running += direction.signed(*amount);
                Some(*running)
            })
            .fold(0, i64::min)
    }
}

/// Generate a plan of up to `max_steps` movements.
pub fn movement_plan(max_steps: usize) -> impl Strategy<Value = MovementPlan> {
    prop::collection::vec((direction(), amount()), 0..=max_steps)
        .prop_map(|steps| MovementPlan { steps })
}

#[cfg(test)]
mod tests {
    use super::*;
    use lotledger_core::validate_item_key;

    proptest! {
        #[test]
        fn test_generated_keys_are_valid(key in item_key()) {
            prop_assert!(validate_item_key(&key).is_ok());
        }

        #[test]
        fn test_low_water_mark_bounds_net(plan in movement_plan(20)) {
            prop_assert!(plan.low_water_mark() <= plan.net().min(0));
        }
    }

    #[test]
    fn test_plan_arithmetic() {
        let plan = MovementPlan {
            steps: vec![
                (Direction::Outbound, 3),
                (Direction::Inbound, 10),
                (Direction::Outbound, 4),
            ],
        };
        assert_eq!(plan.net(), 3);
        assert_eq!(plan.low_water_mark(), -3);
    }
}
