//! Network address rules.

use std::fmt;
use std::net::{IpAddr, ToSocketAddrs};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, LazyLock, mpsc};
use std::thread;
use std::time::Duration;

use tracing::debug;

use super::ensure_plain;
use crate::error::RuleResult;
use crate::rule::{Check, RuleContext};

static EMAIL_REGEX: LazyLock<regex::Regex> = LazyLock::new(|| {
    regex::Regex::new(
        r"^[a-zA-Z0-9!#$%&'*+/=?^_`{|}~-]+(?:\.[a-zA-Z0-9!#$%&'*+/=?^_`{|}~-]+)*@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)+$",
    )
    .expect("email pattern is valid")
});

const URL_SCHEMES: [&str; 3] = ["http://", "https://", "ftp://"];

/// Applies `test` to a string value; null passes, other types fail.
fn check_str(ctx: &RuleContext<'_>, test: impl FnOnce(&str) -> bool) -> RuleResult {
    if ctx.is_null() {
        return Ok(());
    }
    ensure_plain(ctx.value_or_null().as_str().is_some_and(test))
}

// ============================================================================
// EMAIL / IP
// ============================================================================

/// An email address with a dotted domain.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Email;

impl Check for Email {
    fn check(&self, ctx: &RuleContext<'_>) -> RuleResult {
        check_str(ctx, |s| EMAIL_REGEX.is_match(s))
    }
}

/// An IPv4 or IPv6 address.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Ip;

impl Check for Ip {
    fn check(&self, ctx: &RuleContext<'_>) -> RuleResult {
        check_str(ctx, |s| s.parse::<IpAddr>().is_ok())
    }
}

// ============================================================================
// URL
// ============================================================================

/// An `http`, `https` or `ftp` URL with a host.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Url;

impl Url {
    fn parse(s: &str) -> Option<url::Url> {
        if !URL_SCHEMES.iter().any(|scheme| s.contains(scheme)) {
            return None;
        }
        url::Url::parse(s).ok().filter(url::Url::has_host)
    }
}

impl Check for Url {
    fn check(&self, ctx: &RuleContext<'_>) -> RuleResult {
        check_str(ctx, |s| Url::parse(s).is_some())
    }
}

/// Answers whether a host name resolves.
pub trait HostResolver: Send + Sync + 'static {
    fn resolves(&self, host: &str) -> bool;
}

impl<F> HostResolver for F
where
    F: Fn(&str) -> bool + Send + Sync + 'static,
{
    fn resolves(&self, host: &str) -> bool {
        self(host)
    }
}

/// Bounded count of host lookups still running.
#[derive(Debug)]
struct LookupSlots {
    pending: AtomicUsize,
    limit: usize,
}

impl LookupSlots {
    const fn new(limit: usize) -> Self {
        Self {
            pending: AtomicUsize::new(0),
            limit,
        }
    }

    /// Takes a slot, or `None` when `limit` lookups are already pending.
    fn acquire(&'static self) -> Option<LookupSlot> {
        self.pending
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |pending| {
                (pending < self.limit).then_some(pending + 1)
            })
            .ok()
            .map(|_| LookupSlot(self))
    }

    fn pending(&self) -> usize {
        self.pending.load(Ordering::Acquire)
    }
}

/// Released when the lookup thread finishes, not when the caller stops
/// waiting.
struct LookupSlot(&'static LookupSlots);

impl Drop for LookupSlot {
    fn drop(&mut self) {
        self.0.pending.fetch_sub(1, Ordering::AcqRel);
    }
}

static LOOKUPS: LookupSlots = LookupSlots::new(SystemResolver::MAX_PENDING_LOOKUPS);

/// Resolves through the operating system, giving up after `timeout`.
///
/// Each lookup runs on its own helper thread. On timeout the thread is left
/// to finish on its own and the host counts as unresolved. At most
/// [`MAX_PENDING_LOOKUPS`](Self::MAX_PENDING_LOOKUPS) lookup threads exist
/// per process, timed out ones included; past that, hosts count as
/// unresolved without a lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SystemResolver {
    timeout: Duration,
}

impl SystemResolver {
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(2);
    pub const MAX_PENDING_LOOKUPS: usize = 8;

    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl Default for SystemResolver {
    fn default() -> Self {
        Self::new(Self::DEFAULT_TIMEOUT)
    }
}

impl HostResolver for SystemResolver {
    fn resolves(&self, host: &str) -> bool {
        let Some(slot) = LOOKUPS.acquire() else {
            debug!(host, pending = LOOKUPS.pending(), "too many pending host lookups");
            return false;
        };

        let (tx, rx) = mpsc::channel();
        let target = host.to_owned();

        let spawned = thread::Builder::new()
            .name("urlactive-lookup".to_owned())
            .spawn(move || {
                let _slot = slot;
                let found = (target.as_str(), 0)
                    .to_socket_addrs()
                    .is_ok_and(|mut addrs| addrs.next().is_some());
                let _ = tx.send(found);
            });

        if let Err(err) = spawned {
            debug!(host, error = %err, "could not spawn host lookup");
            return false;
        }

        rx.recv_timeout(self.timeout).unwrap_or_else(|_| {
            debug!(host, timeout = ?self.timeout, "host lookup timed out");
            false
        })
    }
}

/// A valid [`Url`] whose host resolves.
///
/// IP literal hosts count as active without a lookup.
#[derive(Clone)]
pub struct UrlActive {
    resolver: Arc<dyn HostResolver>,
}

impl UrlActive {
    pub fn with_resolver(resolver: impl HostResolver) -> Self {
        Self {
            resolver: Arc::new(resolver),
        }
    }
}

impl Default for UrlActive {
    fn default() -> Self {
        Self::with_resolver(SystemResolver::default())
    }
}

impl fmt::Debug for UrlActive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UrlActive").finish_non_exhaustive()
    }
}

impl Check for UrlActive {
    fn check(&self, ctx: &RuleContext<'_>) -> RuleResult {
        check_str(ctx, |s| {
            Url::parse(&s.to_lowercase()).is_some_and(|url| match url.host() {
                Some(url::Host::Domain(domain)) => self.resolver.resolves(domain),
                Some(url::Host::Ipv4(_) | url::Host::Ipv6(_)) => true,
                None => false,
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::testing::{fails, passes, run_missing};
    use crate::value::Value;
    use rstest::rstest;
    use std::sync::Mutex;

    #[rstest]
    #[case("user@example.com", true)]
    #[case("first.last+tag@mail.example.org", true)]
    #[case("invalid", false)]
    #[case("@example.com", false)]
    #[case("user@", false)]
    #[case("user@localhost", false)]
    #[case("a..b@example.com", false)]
    fn email(#[case] value: &str, #[case] ok: bool) {
        assert_eq!(passes(&Email, value), ok);
    }

    #[rstest]
    #[case("127.0.0.1", true)]
    #[case("::1", true)]
    #[case("2001:db8::ff00:42:8329", true)]
    #[case("256.0.0.1", false)]
    #[case("localhost", false)]
    fn ip(#[case] value: &str, #[case] ok: bool) {
        assert_eq!(passes(&Ip, value), ok);
    }

    #[rstest]
    #[case("http://example.com", true)]
    #[case("https://example.com/path?q=1", true)]
    #[case("ftp://files.example.com", true)]
    #[case("mailto:user@example.com", false)]
    #[case("example.com", false)]
    #[case("http://", false)]
    fn url(#[case] value: &str, #[case] ok: bool) {
        assert_eq!(passes(&Url, value), ok);
    }

    #[test]
    fn network_rules_skip_null_and_reject_non_strings() {
        assert!(run_missing(&Email).is_ok());
        assert!(passes(&Url, Value::Null));
        assert!(fails(&Ip, 127));
    }

    #[test]
    fn urlactive_resolves_the_lowercased_host() {
        let asked = Arc::new(Mutex::new(Vec::new()));
        let log = Arc::clone(&asked);
        let rule = UrlActive::with_resolver(move |host: &str| {
            log.lock().unwrap().push(host.to_owned());
            host == "example.com"
        });

        assert!(passes(&rule, "https://EXAMPLE.com/x"));
        assert!(fails(&rule, "https://nowhere.invalid"));
        assert!(fails(&rule, "not a url"));
        assert!(passes(&rule, "http://127.0.0.1/"));
        assert_eq!(*asked.lock().unwrap(), ["example.com", "nowhere.invalid"]);
    }

    #[test]
    fn system_resolver_defaults_to_two_seconds() {
        assert_eq!(SystemResolver::default().timeout(), Duration::from_secs(2));
    }

    #[test]
    fn lookup_slots_are_bounded() {
        static SLOTS: LookupSlots = LookupSlots::new(2);

        let first = SLOTS.acquire().unwrap();
        let second = SLOTS.acquire().unwrap();
        assert!(SLOTS.acquire().is_none());
        assert_eq!(SLOTS.pending(), 2);

        drop(first);
        let third = SLOTS.acquire();
        assert!(third.is_some());

        drop((second, third));
        assert_eq!(SLOTS.pending(), 0);
    }
}
