// This binary crate is intentionally minimal.
// All neural network logic lives in the library (src/lib.rs and its modules).
// Run the demos with:
//   cargo run --example xor
//   cargo run --example iris -- path/to/iris.csv
fn main() {
    println!("neurite: a tiny feed-forward neural network engine in Rust.");
    println!("Run `cargo run --example xor` to see the XOR demo.");
}
