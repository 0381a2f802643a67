// tests/scanners_test.rs

mod common;

use common::*;
use reconwatch::core::error::Error;
use reconwatch::core::models::{DeviceType, ScanResult, EMPTY_WORDLIST, NO_DIRECTORIES, NO_SUBDOMAINS};
use reconwatch::core::novelty::KnownHosts;
use reconwatch::core::probe::LookupFailure;
use reconwatch::core::scanner::{
    CancelToken, DirectoryEnumerator, NetworkScanner, NslookupWhoisLookup, Scanner, SubdomainEnumerator,
};
use reconwatch::core::wordlist::WordlistSource;
use std::net::Ipv4Addr;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

fn inline(entries: &[&str]) -> WordlistSource {
    WordlistSource::Inline(entries.iter().map(|e| e.to_string()).collect())
}

// --- Directory enumeration ---

#[tokio::test]
async fn directory_scan_records_only_interesting_codes() {
    let http = StubHttp::default().with("http://site.test/admin", 200);
    let scanner = DirectoryEnumerator::new("site.test", inline(&["/admin", "/secret"]), Arc::new(http));

    let result = scanner.run().await.unwrap();

    assert_eq!(result, ScanResult::Findings(vec!["http://site.test/admin (200)".to_string()]));
    assert_eq!(scanner.target().as_deref(), Some("http://site.test"));
}

#[tokio::test]
async fn directory_scan_keeps_wordlist_order_and_skips_failures() {
    let http = StubHttp::default()
        .with("https://site.test/login", 302)
        .failing("https://site.test/api")
        .with("https://site.test/private", 403)
        .with("https://site.test/old", 301);
    let scanner =
        DirectoryEnumerator::new("https://site.test/", inline(&["login", "api", "private", "old"]), Arc::new(http))
            .with_concurrency(4);

    let result = scanner.run().await.unwrap();

    assert_eq!(
        result.lines(),
        vec![
            "https://site.test/login (302)",
            "https://site.test/private (403)",
            "https://site.test/old (301)",
        ]
    );
}

#[tokio::test]
async fn directory_scan_without_hits_reports_placeholder() {
    let scanner = DirectoryEnumerator::new("site.test", inline(&["/nothing"]), Arc::new(StubHttp::default()));
    assert_eq!(scanner.run().await.unwrap(), ScanResult::Placeholder(NO_DIRECTORIES.to_string()));
}

#[tokio::test]
async fn directory_scan_with_missing_wordlist_reports_placeholder() {
    let source = WordlistSource::File("/nonexistent/reconwatch/dirs.txt".into());
    let scanner = DirectoryEnumerator::new("site.test", source, Arc::new(StubHttp::default()));
    assert_eq!(scanner.run().await.unwrap(), ScanResult::Placeholder(EMPTY_WORDLIST.to_string()));
}

#[tokio::test]
async fn cancelled_directory_scan_returns_partial_findings() {
    let http = StubHttp::default()
        .with("http://site.test/a", 200)
        .with("http://site.test/b", 403)
        .stalling("http://site.test/slow")
        .with("http://site.test/c", 200);
    let stalled = http.stalled_hit.clone();
    let cancel = CancelToken::new();
    let scanner = DirectoryEnumerator::new("site.test", inline(&["/a", "/b", "/slow", "/c"]), Arc::new(http))
        .with_concurrency(1)
        .with_cancel(cancel.clone());

    let run = tokio::spawn(async move { scanner.run().await });
    stalled.notified().await;
    cancel.cancel();

    let result = tokio::time::timeout(Duration::from_secs(5), run).await.unwrap().unwrap().unwrap();
    assert_eq!(result.lines(), vec!["http://site.test/a (200)", "http://site.test/b (403)"]);
}

// --- Subdomain enumeration ---

#[tokio::test]
async fn subdomain_scan_lists_resolving_names() {
    let dns = StubDns::resolving(&[("www.example.test", Ipv4Addr::new(192, 0, 2, 10))]);
    let scanner = SubdomainEnumerator::new("example.test", inline(&["www", "mail"]), Arc::new(dns));

    let result = scanner.run().await.unwrap();

    assert_eq!(result, ScanResult::Findings(vec!["www.example.test".to_string()]));
}

#[tokio::test]
async fn subdomain_scan_normalizes_the_domain() {
    let dns = StubDns::resolving(&[("api.example.test", Ipv4Addr::new(192, 0, 2, 11))]);
    let scanner =
        SubdomainEnumerator::new("https://Example.TEST/some/path", inline(&["api"]), Arc::new(dns));

    assert_eq!(scanner.domain(), "example.test");
    assert_eq!(scanner.run().await.unwrap().lines(), vec!["api.example.test"]);
}

#[tokio::test]
async fn subdomain_scan_treats_expected_failures_as_misses() {
    let dns = StubDns::default()
        .with_failure("slow.example.test", LookupFailure::Timeout)
        .with_failure("empty.example.test", LookupFailure::NoAnswer);
    let scanner =
        SubdomainEnumerator::new("example.test", inline(&["slow", "empty", "gone"]), Arc::new(dns)).with_concurrency(3);

    assert_eq!(scanner.run().await.unwrap(), ScanResult::Placeholder(NO_SUBDOMAINS.to_string()));
}

#[tokio::test]
async fn subdomain_scan_aborts_on_unexpected_resolver_failure() {
    let dns = StubDns::resolving(&[("www.example.test", Ipv4Addr::new(192, 0, 2, 10))])
        .with_failure("mail.example.test", LookupFailure::Other("SERVFAIL".to_string()));
    let scanner = SubdomainEnumerator::new("example.test", inline(&["www", "mail"]), Arc::new(dns));

    match scanner.run().await {
        Err(Error::Resolver { name, cause }) => {
            assert_eq!(name, "mail.example.test");
            assert_eq!(cause, "SERVFAIL");
        }
        other => panic!("expected resolver error, got {other:?}"),
    }
}

#[tokio::test]
async fn subdomain_scan_with_empty_wordlist_reports_placeholder() {
    let scanner = SubdomainEnumerator::new("example.test", inline(&["# only a comment", "   "]), Arc::new(StubDns::default()));
    assert_eq!(scanner.run().await.unwrap(), ScanResult::Placeholder(EMPTY_WORDLIST.to_string()));
}

// --- Network scan ---

#[tokio::test]
async fn network_scan_alerts_only_on_new_hosts() {
    let known_hosts = Arc::new(KnownHosts::new());
    let connections = Arc::new(StubConnections::with(&["10.0.0.1:443", "10.0.0.2:22"]));
    let dns = Arc::new(StubDns::default().with_ptr("10.0.0.2", "office-printer.lan"));
    let scanner = NetworkScanner::new(connections.clone(), dns.clone(), known_hosts.clone());

    let first = scanner.run().await.unwrap();
    let alerts: Vec<_> = first.alerts().iter().map(|a| a.message.as_str()).collect();
    assert_eq!(alerts, vec!["New device detected: 10.0.0.1", "New device detected: 10.0.0.2"]);
    assert_eq!(first.hosts()[0].hostname, "Unknown");
    assert_eq!(first.hosts()[0].device_type, DeviceType::Computer);
    assert_eq!(first.hosts()[1].device_type, DeviceType::Printer);

    connections.set(&["10.0.0.1:443", "10.0.0.3:80"]);
    let second = scanner.run().await.unwrap();
    let alerts: Vec<_> = second.alerts().iter().map(|a| a.message.as_str()).collect();
    assert_eq!(alerts, vec!["New device detected: 10.0.0.3"]);
    assert_eq!(known_hosts.len(), 3);
}

#[tokio::test]
async fn network_scan_collapses_connections_to_one_host() {
    let connections = Arc::new(StubConnections::with(&["10.0.0.5:443", "10.0.0.5:8443", "[2001:db8::1]:443"]));
    let scanner = NetworkScanner::new(connections, Arc::new(StubDns::default()), Arc::new(KnownHosts::new()));

    let result = scanner.run().await.unwrap();

    let ips: Vec<_> = result.hosts().iter().map(|h| h.ip.as_str()).collect();
    assert_eq!(ips, vec!["10.0.0.5", "2001:db8::1"]);
    assert_eq!(result.alerts().len(), 2);
}

#[tokio::test]
async fn network_scan_resolves_each_peer_once_within_the_pool_limit() {
    let table: Vec<String> = (0..12).flat_map(|i| [format!("10.0.1.{i}:443"), format!("10.0.1.{i}:80")]).collect();
    let table: Vec<&str> = table.iter().map(String::as_str).collect();
    let connections = Arc::new(StubConnections::with(&table));
    let dns = Arc::new(
        StubDns::default()
            .with_ptr("10.0.1.3", "lobby-printer.lan")
            .with_reverse_delay(Duration::from_millis(10)),
    );
    let scanner = NetworkScanner::new(connections, dns.clone(), Arc::new(KnownHosts::new())).with_concurrency(3);

    let result = scanner.run().await.unwrap();

    assert_eq!(result.hosts().len(), 12);
    assert_eq!(result.hosts()[3].hostname, "lobby-printer.lan");
    assert_eq!(dns.reverse_calls.load(Ordering::SeqCst), 12);
    assert!(dns.reverse_peak.load(Ordering::SeqCst) <= 3);
}

#[tokio::test]
async fn network_scan_with_no_connections_lists_nothing() {
    let connections = Arc::new(StubConnections::with(&[]));
    let scanner = NetworkScanner::new(connections, Arc::new(StubDns::default()), Arc::new(KnownHosts::new()));

    let result = scanner.run().await.unwrap();

    assert!(result.hosts().is_empty());
    assert_eq!(result.lines(), vec!["No active connections found"]);
}

#[tokio::test]
async fn network_scan_surfaces_unreadable_connection_table() {
    let connections = Arc::new(StubConnections::default());
    connections.unreadable();
    let known_hosts = Arc::new(KnownHosts::new());
    let scanner = NetworkScanner::new(connections, Arc::new(StubDns::default()), known_hosts.clone());

    assert!(matches!(scanner.run().await, Err(Error::ConnectionTable(_))));
    assert!(known_hosts.is_empty());
}

// --- NSLookup & WHOIS ---

#[tokio::test]
async fn lookup_reports_address_and_registration() {
    let dns = StubDns::resolving(&[("example.test", Ipv4Addr::new(93, 184, 216, 34))]);
    let whois = StubWhois(Ok(REGISTRY_ANSWER.to_string()));
    let scanner = NslookupWhoisLookup::new("http://example.test/", Arc::new(dns), Arc::new(whois));

    let result = scanner.run().await.unwrap();

    assert_eq!(
        result.lines(),
        vec![
            "NSLookup Result for example.test:",
            "  - IP Address: 93.184.216.34",
            "WHOIS Information:",
            "  - Registrar: Example Registrar, Inc.",
            "  - Creation Date: 1995-08-14 04:00:00",
            "  - Last Updated: 2024-08-14 07:01:34",
            "  - Name Servers: a.iana-servers.net, b.iana-servers.net",
        ]
    );
}

#[tokio::test]
async fn lookup_reports_both_failures() {
    let whois = StubWhois(Err("whois.iana.org: timed out".to_string()));
    let scanner = NslookupWhoisLookup::new("nowhere.test", Arc::new(StubDns::default()), Arc::new(whois));

    let lines = scanner.run().await.unwrap().lines();

    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("NSLookup failed:"));
    assert!(lines[1].starts_with("WHOIS failed:"));
}

#[tokio::test]
async fn lookup_treats_empty_registry_answer_as_failure() {
    let dns = StubDns::resolving(&[("example.test", Ipv4Addr::new(192, 0, 2, 1))]);
    let whois = StubWhois(Ok("% No match for domain\n".to_string()));
    let scanner = NslookupWhoisLookup::new("example.test", Arc::new(dns), Arc::new(whois));

    let lines = scanner.run().await.unwrap().lines();

    assert_eq!(lines[0], "NSLookup Result for example.test:");
    assert_eq!(lines.last().unwrap(), "WHOIS failed: no registration data for example.test");
}
