use serde::{Deserialize, Serialize};
use sim_types::{DEFAULT_LINK_DELAY, DEFAULT_VERIFY_RATE};

/// Which chain-selection policy a miner runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StrategyKind {
    Honest,
    /// Majority-censor attacker. Only sensible with hashrate > 0.5.
    Bad,
    /// Private-branch withholding attacker.
    Selfish,
}

impl std::str::FromStr for StrategyKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "honest" => Ok(StrategyKind::Honest),
            "bad" => Ok(StrategyKind::Bad),
            "selfish" => Ok(StrategyKind::Selfish),
            other => Err(format!("unknown strategy: {other}")),
        }
    }
}

/// Static parameters for one miner in a topology.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MinerSpec {
    pub hashrate: f64,
    pub verify_rate: f64,
    pub strategy: StrategyKind,
}

impl MinerSpec {
    pub fn honest(hashrate: f64) -> Self {
        MinerSpec {
            hashrate,
            verify_rate: DEFAULT_VERIFY_RATE,
            strategy: StrategyKind::Honest,
        }
    }

    pub fn bad(hashrate: f64) -> Self {
        MinerSpec {
            strategy: StrategyKind::Bad,
            ..MinerSpec::honest(hashrate)
        }
    }

    pub fn selfish(hashrate: f64) -> Self {
        MinerSpec {
            strategy: StrategyKind::Selfish,
            ..MinerSpec::honest(hashrate)
        }
    }
}

/// An explicit directed link, used to build asymmetric topologies — e.g. a
/// line of miners where one is starved of direct announcements.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinkSpec {
    pub src: usize,
    pub dst: usize,
    pub delay: f64,
}

/// Full parameters for one simulation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    pub miners: Vec<MinerSpec>,
    pub duration_seconds: f64,
    pub seed: u64,
    /// Symmetric link delay used when `links` is empty (full mesh).
    pub default_link_delay: f64,
    /// Explicit directed links. When empty, the topology builder wires a
    /// symmetric full mesh at `default_link_delay`.
    pub links: Vec<LinkSpec>,
}

impl SimulationConfig {
    /// Equal-hashrate honest network, symmetric full mesh — backs the
    /// `simulate(num_miners, duration_days, strategy, seed)` convenience
    /// entry point.
    pub fn uniform(num_miners: usize, duration_days: f64, strategy: StrategyKind, seed: u64) -> Self {
        let hashrate = 1.0 / num_miners as f64;
        let mut miners: Vec<MinerSpec> = (0..num_miners).map(|_| MinerSpec::honest(hashrate)).collect();
        if let Some(first) = miners.first_mut() {
            first.strategy = strategy;
        }
        SimulationConfig {
            miners,
            duration_seconds: duration_days * 86_400.0,
            seed,
            default_link_delay: DEFAULT_LINK_DELAY,
            links: Vec::new(),
        }
    }

    pub fn with_links(mut self, links: Vec<LinkSpec>) -> Self {
        self.links = links;
        self
    }

    pub fn with_link_delay(mut self, delay: f64) -> Self {
        self.default_link_delay = delay;
        self
    }
}
