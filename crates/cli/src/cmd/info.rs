//! Implementation of the `depgraph info` command.

use depgraph_platform::PlatformInfo;

pub fn cmd_info() {
  let info = PlatformInfo::current();

  println!("depgraph v{}", env!("CARGO_PKG_VERSION"));
  println!();
  println!("  Platform: {}", info.platform.triple());
  println!("  Name:     {}", info.platform.name());
  println!("  OS:       {}", info.os.as_str());
  println!("  Arch:     {}", info.arch.as_str());
  println!("  User:     {}", info.username);
  println!("  Hostname: {}", info.hostname);
}
