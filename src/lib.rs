//! Rule engine, concurrent arena and resumable playoffs for N×N five-in-a-row agents.

pub mod engine;
pub mod games;
