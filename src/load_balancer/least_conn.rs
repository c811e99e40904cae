//! Least-outstanding-requests load balancing strategy.

use std::sync::Arc;

use crate::load_balancer::{upstream::Upstream, LoadBalancer};

/// Index of the upstream with the fewest outstanding requests.
///
/// Ties go to the earliest entry, so pool order is the tie-breaker.
pub fn least_loaded(upstreams: &[Arc<Upstream>]) -> Option<usize> {
    upstreams
        .iter()
        .enumerate()
        .min_by_key(|(_, u)| u.in_flight())
        .map(|(i, _)| i)
}

/// Least outstanding selector.
/// Selects the upstream with the minimum number of in-flight requests.
#[derive(Debug, Default)]
pub struct LeastOutstanding;

impl LeastOutstanding {
    pub fn new() -> Self {
        Self
    }
}

impl LoadBalancer for LeastOutstanding {
    fn next_server(&self, upstreams: &[Arc<Upstream>]) -> Option<Arc<Upstream>> {
        least_loaded(upstreams).map(|i| upstreams[i].clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pool(addrs: &[&str]) -> Vec<Arc<Upstream>> {
        addrs
            .iter()
            .map(|a| Arc::new(Upstream::new(a).unwrap()))
            .collect()
    }

    #[test]
    fn test_least_outstanding() {
        let lb = LeastOutstanding::new();
        let upstreams = pool(&["127.0.0.1:8080", "127.0.0.1:8081"]);

        // b1 busy, b2 idle
        let _busy = upstreams[0].acquire();
        let s1 = lb.next_server(&upstreams).unwrap();
        assert_eq!(s1.authority(), upstreams[1].authority());

        // now b2 has 2, b1 has 1
        let _a = upstreams[1].acquire();
        let _b = upstreams[1].acquire();
        let s2 = lb.next_server(&upstreams).unwrap();
        assert_eq!(s2.authority(), upstreams[0].authority());
    }

    #[test]
    fn ties_follow_pool_order() {
        let upstreams = pool(&["10.0.0.1:80", "10.0.0.2:80", "10.0.0.3:80"]);
        assert_eq!(least_loaded(&upstreams), Some(0));

        let _g0 = upstreams[0].acquire();
        assert_eq!(least_loaded(&upstreams), Some(1));

        let _g1 = upstreams[1].acquire();
        assert_eq!(least_loaded(&upstreams), Some(2));

        let _g2 = upstreams[2].acquire();
        assert_eq!(least_loaded(&upstreams), Some(0));
    }

    #[test]
    fn empty_pool_selects_nothing() {
        assert_eq!(least_loaded(&[]), None);
        assert!(LeastOutstanding::new().next_server(&[]).is_none());
    }
}
