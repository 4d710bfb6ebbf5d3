use std::fmt;
use std::str::FromStr;

use memsim_error::{errinput, Error};
use serde::{Deserialize, Serialize};

use crate::page::Page;

pub(crate) mod fifo_replacer;
pub(crate) mod lru_replacer;
pub(crate) mod optimal_replacer;
pub(crate) mod replacer;

use fifo_replacer::FifoReplacer;
use lru_replacer::LruReplacer;
use optimal_replacer::OptimalReplacer;
use replacer::Replacer;

/// The page-replacement policies the simulator can replay.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Policy {
    #[default]
    #[serde(rename = "FIFO")]
    Fifo,
    #[serde(rename = "LRU")]
    Lru,
    #[serde(rename = "Optimal", alias = "OPT")]
    Optimal,
}

impl Policy {
    pub const ALL: [Policy; 3] = [Policy::Fifo, Policy::Lru, Policy::Optimal];

    pub fn name(&self) -> &'static str {
        match self {
            Policy::Fifo => "FIFO",
            Policy::Lru => "LRU",
            Policy::Optimal => "Optimal",
        }
    }

    /// Builds a fresh replacer for one run over `reference` with `capacity` frames.
    pub(crate) fn replacer<'a>(
        self,
        reference: &'a [Page],
        capacity: usize,
    ) -> Box<dyn Replacer + 'a> {
        match self {
            Policy::Fifo => Box::new(FifoReplacer::new(capacity)),
            Policy::Lru => Box::new(LruReplacer::new()),
            Policy::Optimal => Box::new(OptimalReplacer::new(reference)),
        }
    }
}

impl fmt::Display for Policy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Policy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "FIFO" => Ok(Policy::Fifo),
            "LRU" => Ok(Policy::Lru),
            "OPTIMAL" | "OPT" => Ok(Policy::Optimal),
            _ => errinput!("unknown algorithm {:?}, expected one of FIFO, LRU, Optimal", s),
        }
    }
}
