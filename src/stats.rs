use std::fmt;

/// Aggregate view of a heap, produced by [`Heap::report`](crate::Heap::report).
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct HeapStats {
  /// Address of the first byte of the byte store.
  pub base: usize,
  /// Address of the current break.
  pub brk: usize,
  /// Committed bytes, `brk - base`.
  pub used: usize,
  /// Number of registered blocks.
  pub blocks: usize,
  /// Payload bytes of blocks currently handed out.
  pub allocated: usize,
  /// Payload bytes of registered blocks that are free.
  pub free: usize,
}

impl fmt::Display for HeapStats {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>,
  ) -> fmt::Result {
    writeln!(f, "=== Heap Statistics ===")?;
    writeln!(f, "Heap base: {:#x}", self.base)?;
    writeln!(f, "Program break: {:#x}", self.brk)?;
    writeln!(f, "Heap used: {} bytes", self.used)?;
    writeln!(f, "Number of blocks: {}", self.blocks)?;
    writeln!(f, "Allocated: {} bytes", self.allocated)?;
    writeln!(f, "Free: {} bytes", self.free)?;
    write!(f, "====================")
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_display_field_order() {
    let stats = HeapStats {
      base: 0x1000,
      brk: 0x3000,
      used: 0x2000,
      blocks: 2,
      allocated: 4072,
      free: 4072,
    };

    let expected = "\
=== Heap Statistics ===
Heap base: 0x1000
Program break: 0x3000
Heap used: 8192 bytes
Number of blocks: 2
Allocated: 4072 bytes
Free: 4072 bytes
====================";

    assert_eq!(stats.to_string(), expected);
  }
}
