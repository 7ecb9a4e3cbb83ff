//! Round-robin load balancing strategy.

use crate::load_balancer::{RoutingKind, RoutingStrategy};

/// Round-robin selector.
///
/// The cursor is sticky: it is not reset when the healthy list shrinks or
/// grows, it is reinterpreted modulo the current candidate count.
#[derive(Debug, Default)]
pub struct RoundRobin {
    cursor: u64,
}

impl RoundRobin {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of successful selections since creation or last reset.
    pub fn cursor(&self) -> u64 {
        self.cursor
    }
}

impl RoutingStrategy for RoundRobin {
    fn kind(&self) -> RoutingKind {
        RoutingKind::RoundRobin
    }

    fn pick_host<'a>(&mut self, healthy: &[&'a str]) -> Option<&'a str> {
        if healthy.is_empty() {
            return None;
        }

        let index = (self.cursor % healthy.len() as u64) as usize;
        self.cursor = self.cursor.wrapping_add(1);
        Some(healthy[index])
    }

    fn reset(&mut self) {
        self.cursor = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_round_robin() {
        let mut lb = RoundRobin::new();
        let hosts = ["127.0.0.1:8080", "127.0.0.1:8081"];

        assert_eq!(lb.pick_host(&hosts), Some("127.0.0.1:8080"));
        assert_eq!(lb.pick_host(&hosts), Some("127.0.0.1:8081"));
        assert_eq!(lb.pick_host(&hosts), Some("127.0.0.1:8080"));
    }

    #[test]
    fn test_empty_does_not_advance() {
        let mut lb = RoundRobin::new();
        assert_eq!(lb.pick_host(&[]), None);
        assert_eq!(lb.cursor(), 0);
    }

    #[test]
    fn test_sticky_cursor_under_shrink() {
        let mut lb = RoundRobin::new();
        assert_eq!(lb.pick_host(&["A", "B"]), Some("A"));

        // A removed: cursor 1 mod 1 = 0 -> B
        assert_eq!(lb.pick_host(&["B"]), Some("B"));
        assert_eq!(lb.cursor(), 2);
    }

    #[test]
    fn test_sticky_cursor_under_growth() {
        let mut lb = RoundRobin::new();
        for _ in 0..3 {
            lb.pick_host(&["A", "B"]);
        }
        // cursor 3 mod 3 = 0
        assert_eq!(lb.pick_host(&["A", "B", "C"]), Some("A"));
        assert_eq!(lb.pick_host(&["A", "B", "C"]), Some("B"));
    }

    #[test]
    fn test_reset() {
        let mut lb = RoundRobin::new();
        lb.pick_host(&["A", "B"]);
        lb.reset();
        assert_eq!(lb.cursor(), 0);
        assert_eq!(lb.pick_host(&["A", "B"]), Some("A"));
    }

    #[test]
    fn test_cursor_wraps() {
        let mut lb = RoundRobin { cursor: u64::MAX };
        assert_eq!(lb.pick_host(&["A"]), Some("A"));
        assert_eq!(lb.cursor(), 0);
    }

    proptest! {
        #[test]
        fn prop_each_host_once_per_cycle(count in 1usize..16, cycles in 1usize..4) {
            let names: Vec<String> = (0..count).map(|i| format!("host-{i}:80")).collect();
            let hosts: Vec<&str> = names.iter().map(String::as_str).collect();
            let mut lb = RoundRobin::new();

            for _ in 0..cycles {
                let picked: Vec<&str> = (0..count)
                    .map(|_| lb.pick_host(&hosts).unwrap())
                    .collect();
                prop_assert_eq!(&picked, &hosts);
            }
        }
    }
}
