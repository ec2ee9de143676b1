//! Closed tag enums for every cell-level state machine in the simulator.
//!
//! spec.md §9 calls out the source's plain integer constants (`READY = 0`,
//! `REMOVE = 1`, ...) as a pattern to clean up into a tagged variant per
//! cell. These enums are that variant; banks and buffers index into flat
//! `ndarray` matrices of them rather than raw integers.

/// State of one cell in an SRAM1/SRAM2 bank.
///
/// `Ready` -> `Remove` -> `Removing` -> `Ready` (spec.md §3).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum SramTag {
    #[default]
    Ready,
    Remove,
    Removing,
}

/// State of one MAC-array accumulator slot.
///
/// `Null` -> `Subsum` -> `CompleteSum` -> `Removing` -> `Null` (spec.md §4.2).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ArrayTag {
    #[default]
    Null,
    Subsum,
    CompleteSum,
    Removing,
}

/// State of one cell in a global buffer's A-state matrix (attention score
/// matrix A, or by analogy the post-projection X matrix paired with GB6).
///
/// Plain flow: `Null` -> `Ready` -> `Removing` -> `Ready` (array drain).
/// Softmax/LayerNorm flow: `Ready` -> `Removing` (to SFU) -> `Cal` (inside
/// SFU) -> `Removing` (back) -> `Done` (spec.md §4.3).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum AStateTag {
    #[default]
    Null,
    Ready,
    Cal,
    Done,
    Removing,
}

/// State of one cell in a softmax/layernorm row-granular state matrix
/// (spec.md §4.4, §4.5).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum SfuTag {
    #[default]
    Null,
    DataReady,
    Done,
    Removing,
}
