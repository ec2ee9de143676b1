//! External configuration surface (spec.md §6) and the precondition checks
//! that must fail hard before the engine starts.

use serde::{Deserialize, Serialize};

use crate::error::{SimError, SimResult};

/// The simulator's atomic time quantum, in nanoseconds (spec.md GLOSSARY).
pub const METATIME_NS: f64 = 0.1;

/// Topology selector (spec.md §6 `core_num`). Only the two fully-specified
/// topologies are supported; spec.md §9 deliberately leaves the 5-core
/// variant's stage-switch table undefined.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Topology {
    Single,
    Eight,
}

impl Topology {
    pub fn from_core_num(core_num: u32) -> SimResult<Self> {
        match core_num {
            1 => Ok(Topology::Single),
            8 => Ok(Topology::Eight),
            other => Err(SimError::UnsupportedTopology(other)),
        }
    }

    pub fn core_num(self) -> u32 {
        match self {
            Topology::Single => 1,
            Topology::Eight => 8,
        }
    }
}

/// One of the 8 result-matrix stages in the attention pipeline
/// (SPEC_FULL.md §2, "Pipeline role assignment").
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Role {
    Q,
    K,
    V,
    AttnScore,
    AttnOut,
    PostProj,
    Fc1,
    Fc2,
}

impl Role {
    pub const ALL: [Role; 8] = [
        Role::Q,
        Role::K,
        Role::V,
        Role::AttnScore,
        Role::AttnOut,
        Role::PostProj,
        Role::Fc1,
        Role::Fc2,
    ];

    pub fn index(self) -> usize {
        Role::ALL.iter().position(|r| *r == self).unwrap()
    }

    pub fn next(self) -> Option<Role> {
        Role::ALL.get(self.index() + 1).copied()
    }
}

/// Matrix-multiply shape `(M, K, N)` for one stage: `M` rows (always
/// `seq_length`), `K` reduction dim, `N` output columns (SPEC_FULL.md §3).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StageShape {
    pub m: usize,
    pub k: usize,
    pub n: usize,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SimConfig {
    pub core_num: u32,
    pub sram_capacity: usize,
    pub mac_lane: usize,
    pub mac_num: usize,
    pub sram_access_latency: u64,
    pub gb_access_latency: u64,
    pub gb_sram_bandwidth: usize,
    pub array_access_and_calculation_latency: u64,
    pub softmax_cal_latency: u64,
    pub softmax_throughput: usize,
    pub layernorm_cal_latency: u64,
    pub gb_ln_bandwidth: usize,
    pub ln_sram_bandwidth: usize,
    pub seq_length: usize,
    pub embedding_dim: usize,
    pub head_num: usize,
    pub head_id: usize,
    pub debug_flag: bool,
    /// Hard tick cap to bound runaway tests/runs (spec.md §5).
    pub max_ticks: u64,
}

impl Default for SimConfig {
    /// The literal end-to-end scenario defaults from spec.md §8.
    fn default() -> Self {
        SimConfig {
            core_num: 1,
            sram_capacity: 65536,
            mac_lane: 16,
            mac_num: 32,
            sram_access_latency: 1,
            gb_access_latency: 50,
            gb_sram_bandwidth: 32,
            array_access_and_calculation_latency: 1,
            softmax_cal_latency: 60,
            softmax_throughput: 6,
            layernorm_cal_latency: 10,
            gb_ln_bandwidth: 4,
            ln_sram_bandwidth: 4,
            seq_length: 384,
            embedding_dim: 1024,
            head_num: 16,
            head_id: 0,
            debug_flag: false,
            max_ticks: 50_000_000,
        }
    }
}

impl SimConfig {
    pub fn head_dim(&self) -> usize {
        self.embedding_dim / self.head_num
    }

    pub fn topology(&self) -> SimResult<Topology> {
        Topology::from_core_num(self.core_num)
    }

    /// `seq_length` small enough that the attention matrix A lives entirely
    /// in one SRAM bank (spec.md §8 boundary behavior).
    pub fn use_sram_for_attn(&self) -> bool {
        self.seq_length * self.seq_length <= self.sram_capacity
    }

    pub fn stage_shape(&self, role: Role) -> StageShape {
        let s = self.seq_length;
        let e = self.embedding_dim;
        let h = self.head_dim();
        match role {
            Role::Q | Role::K | Role::V => StageShape { m: s, k: e, n: h },
            Role::AttnScore => StageShape { m: s, k: h, n: s },
            Role::AttnOut => StageShape { m: s, k: s, n: h },
            Role::PostProj => StageShape { m: s, k: h, n: e },
            Role::Fc1 => StageShape { m: s, k: e, n: 4 * e },
            Role::Fc2 => StageShape { m: s, k: 4 * e, n: e },
        }
    }

    /// Required precondition checks (spec.md §6) — fatal if violated.
    pub fn validate(&self) -> SimResult<()> {
        self.topology()?;

        let head_dim = self.head_dim();
        if self.head_num == 0 || self.embedding_dim % self.head_num != 0 {
            return Err(SimError::UnsupportedShape(format!(
                "embedding_dim ({}) must be an exact multiple of head_num ({})",
                self.embedding_dim, self.head_num
            )));
        }

        if self.seq_length * head_dim > self.sram_capacity {
            return Err(SimError::UnsupportedShape(format!(
                "seq_length * head_embedding_dim ({} * {} = {}) exceeds SRAM_capacity ({})",
                self.seq_length,
                head_dim,
                self.seq_length * head_dim,
                self.sram_capacity
            )));
        }

        if self.embedding_dim * head_dim > self.sram_capacity {
            return Err(SimError::UnsupportedShape(format!(
                "embedding_dim * head_embedding_dim ({} * {} = {}) exceeds SRAM_capacity ({})",
                self.embedding_dim,
                head_dim,
                self.embedding_dim * head_dim,
                self.sram_capacity
            )));
        }

        let fc2_weight_column_elems = self.embedding_dim * 4 * self.mac_lane / self.mac_num;
        if self.sram_capacity / self.mac_num < fc2_weight_column_elems {
            return Err(SimError::UnsupportedShape(format!(
                "FC2 weight column does not fit in SRAM2: SRAM_capacity/MAC_num ({}) < \
                 embedding_dim*4*MAC_lane/MAC_num ({})",
                self.sram_capacity / self.mac_num,
                fc2_weight_column_elems
            )));
        }

        if self.ln_sram_bandwidth % 2 != 0 {
            return Err(SimError::UnsupportedShape(format!(
                "LN_SRAM_bandwidth ({}) must be even",
                self.ln_sram_bandwidth
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_validates() {
        SimConfig::default().validate().unwrap();
    }

    #[test]
    fn eight_core_config_validates() {
        let mut cfg = SimConfig::default();
        cfg.core_num = 8;
        cfg.seq_length = 384;
        cfg.validate().unwrap();
    }

    #[test]
    fn unsupported_topology_rejected() {
        let mut cfg = SimConfig::default();
        cfg.core_num = 5;
        assert!(matches!(
            cfg.validate(),
            Err(SimError::UnsupportedTopology(5))
        ));
    }

    #[test]
    fn oversized_seq_length_rejected() {
        let mut cfg = SimConfig::default();
        cfg.seq_length = 1 << 20;
        assert!(matches!(cfg.validate(), Err(SimError::UnsupportedShape(_))));
    }

    #[test]
    fn odd_ln_bandwidth_rejected() {
        let mut cfg = SimConfig::default();
        cfg.ln_sram_bandwidth = 3;
        assert!(matches!(cfg.validate(), Err(SimError::UnsupportedShape(_))));
    }

    #[test]
    fn use_sram_boundary() {
        let mut cfg = SimConfig::default();
        cfg.seq_length = 64;
        assert!(cfg.use_sram_for_attn());
        cfg.seq_length = 384;
        assert!(!cfg.use_sram_for_attn());
    }

    #[test]
    fn stage_shapes_chain_dimensions() {
        let cfg = SimConfig::default();
        let q = cfg.stage_shape(Role::Q);
        let attn = cfg.stage_shape(Role::AttnScore);
        assert_eq!(q.n, attn.k, "Q's output width feeds AttnScore's inner dim");
        let fc1 = cfg.stage_shape(Role::Fc1);
        let fc2 = cfg.stage_shape(Role::Fc2);
        assert_eq!(fc1.n, fc2.k);
    }
}
