/// Process exit codes, keyed by the terminal event of the operation.
pub mod exit {
    /// Terminal event was `Info`.
    pub const SUCCESS: i32 = 0;
    /// Terminal event was `Warning`: some files failed or none were found.
    pub const PARTIAL_FAILURE: i32 = 1;
    /// Terminal event was `Error`: the operation was rejected up front.
    pub const VALIDATION_FAILURE: i32 = 2;
}
