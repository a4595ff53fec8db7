//! Implementation of the `depgraph greet` command.

use depgraph_core::Greeting;

pub fn cmd_greet() {
  println!("{}", Greeting::new().greet());
}
