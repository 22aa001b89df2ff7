//! Ordered operation plans handed to the submission layer.
//!
//! A plan is built ahead of execution and submitted as one atomic request, so a
//! step can only consume values produced by an earlier step of the same plan.

use serde::{Deserialize, Serialize};

/// Handle to the output of a step in the same plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StepHandle(usize);

impl StepHandle {
    /// Position of the step in the plan.
    pub fn index(self) -> usize {
        self.0
    }

    /// The whole result of the step.
    pub fn result(self) -> Argument {
        Argument::Result(self)
    }

    /// One element of a step returning several values.
    pub fn nested(self, index: u16) -> Argument {
        Argument::NestedResult(self, index)
    }
}

/// Pure (non object) call argument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PureValue {
    /// A boolean.
    Bool(bool),
    /// An unsigned 32 bit integer.
    U32(u32),
    /// An unsigned 64 bit integer.
    U64(u64),
    /// An unsigned 128 bit integer.
    U128(u128),
    /// An account address.
    Address(String),
}

/// Input of a step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Argument {
    /// Shared or owned object by id.
    Object(String),
    /// A pure value.
    Pure(PureValue),
    /// The sender's gas coin.
    GasCoin,
    /// The whole result of an earlier step.
    Result(StepHandle),
    /// One element of an earlier step's multi value result.
    NestedResult(StepHandle, u16),
}

impl Argument {
    /// An object argument.
    pub fn object(id: impl Into<String>) -> Self {
        Argument::Object(id.into())
    }

    /// A pure argument.
    pub fn pure(value: PureValue) -> Self {
        Argument::Pure(value)
    }
}

/// A call of a Move entry function.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveCall {
    /// `package::module::function`.
    pub target: String,
    /// Generic type arguments.
    pub type_arguments: Vec<String>,
    /// Call arguments in order.
    pub arguments: Vec<Argument>,
}

/// One step of a plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    /// A Move entry function call.
    MoveCall(MoveCall),
    /// Merges `sources` into the `destination` coin.
    MergeCoins {
        destination: Argument,
        sources: Vec<Argument>,
    },
    /// Transfers `objects` to `recipient`.
    TransferObjects {
        objects: Vec<Argument>,
        recipient: Argument,
    },
    /// A coin of `coin_type` holding exactly `balance`, split from the sender's coins.
    CoinWithBalance {
        coin_type: String,
        balance: u128,
        use_gas_coin: bool,
    },
}

/// Steps executed atomically, in order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plan {
    steps: Vec<Step>,
}

impl Plan {
    /// An empty plan.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a step and returns a handle to its result.
    pub fn push(&mut self, step: Step) -> StepHandle {
        self.steps.push(step);
        StepHandle(self.steps.len() - 1)
    }

    /// Appends a move call and returns a handle to its result.
    pub fn move_call(
        &mut self,
        target: impl Into<String>,
        type_arguments: Vec<String>,
        arguments: Vec<Argument>,
    ) -> StepHandle {
        self.push(Step::MoveCall(MoveCall {
            target: target.into(),
            type_arguments,
            arguments,
        }))
    }

    /// Merges `sources` into `destination`.
    pub fn merge_coins(&mut self, destination: Argument, sources: Vec<Argument>) {
        self.push(Step::MergeCoins {
            destination,
            sources,
        });
    }

    /// Transfers `objects` to `recipient`.
    pub fn transfer_objects(&mut self, objects: Vec<Argument>, recipient: &str) {
        self.push(Step::TransferObjects {
            objects,
            recipient: Argument::pure(PureValue::Address(recipient.to_string())),
        });
    }

    /// Appends a coin of `coin_type` holding exactly `balance`.
    ///
    /// With `use_gas_coin` the coin may be split from the gas coin.
    pub fn coin_with_balance(
        &mut self,
        coin_type: &str,
        balance: u128,
        use_gas_coin: bool,
    ) -> Argument {
        self.push(Step::CoinWithBalance {
            coin_type: coin_type.to_string(),
            balance,
            use_gas_coin,
        })
        .result()
    }

    /// Steps in execution order.
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Number of steps.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Whether the plan has no steps.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Move call targets in order, for logging and assertions.
    pub fn move_call_targets(&self) -> Vec<&str> {
        self.steps
            .iter()
            .filter_map(|step| match step {
                Step::MoveCall(call) => Some(call.target.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Checks that every step only references results of earlier steps.
    pub fn references_are_ordered(&self) -> bool {
        fn earlier(argument: &Argument, index: usize) -> bool {
            match argument {
                Argument::Result(handle) | Argument::NestedResult(handle, _) => {
                    handle.index() < index
                }
                _ => true,
            }
        }

        self.steps.iter().enumerate().all(|(index, step)| match step {
            Step::MoveCall(call) => call.arguments.iter().all(|a| earlier(a, index)),
            Step::MergeCoins {
                destination,
                sources,
            } => earlier(destination, index) && sources.iter().all(|a| earlier(a, index)),
            Step::TransferObjects { objects, recipient } => {
                earlier(recipient, index) && objects.iter().all(|a| earlier(a, index))
            }
            Step::CoinWithBalance { .. } => true,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handles_follow_step_order() {
        let mut plan = Plan::new();
        let coin = plan.coin_with_balance("0x2::sui::SUI", 10, true);
        let call = plan.move_call("0x1::m::f", vec![], vec![coin.clone()]);
        assert_eq!(call.index(), 1);
        plan.transfer_objects(vec![call.nested(0)], "0xabc");

        assert_eq!(plan.len(), 3);
        assert_eq!(plan.move_call_targets(), vec!["0x1::m::f"]);
        assert!(plan.references_are_ordered());
    }

    #[test]
    fn test_forward_reference_is_detected() {
        let mut plan = Plan::new();
        plan.push(Step::MergeCoins {
            destination: StepHandle(3).result(),
            sources: vec![],
        });
        assert!(!plan.references_are_ordered());
    }

    #[test]
    fn test_plan_serializes_to_json() {
        let mut plan = Plan::new();
        plan.move_call(
            "0x1::pool::remove_liquidity",
            vec!["0x2::sui::SUI".to_string()],
            vec![Argument::pure(PureValue::U128(u128::MAX))],
        );
        let json = serde_json::to_string(&plan).unwrap();
        assert!(json.contains("\"target\":\"0x1::pool::remove_liquidity\""));
        assert!(json.contains(&u128::MAX.to_string()));
        let back: Plan = serde_json::from_str(&json).unwrap();
        assert_eq!(back, plan);
    }
}
