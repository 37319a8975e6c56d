use std::fmt::{self, Display};
use std::net::IpAddr;
use std::time::Duration;

use async_trait::async_trait;
use log::{debug, warn};
use tokio::net::lookup_host;
use tokio::time::timeout;

use crate::net_utils::arp_table::{find_hw_addr, lookup_candidates};
use crate::net_utils::command::CommandRunner;

/// ハードウェアアドレスの検索結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddressResult {
    /// 近隣テーブルに表示されたままのMACアドレス
    Address(String),
    /// 検索は完了したが一致するエントリがなかった
    NotFound,
    /// 検索手段自体が失敗した(ツールがない、タイムアウトなど)
    LookupError,
}

impl Display for AddressResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AddressResult::Address(addr) => write!(f, "{addr}"),
            AddressResult::NotFound => write!(f, "Not found"),
            AddressResult::LookupError => write!(f, "Error"),
        }
    }
}

#[async_trait]
pub trait AddressResolver: Send + Sync {
    /// 対象のネットワークアドレスに対応するハードウェアアドレスを近隣テーブルから探す
    async fn resolve(&self, target: &str) -> AddressResult;
}

/// `arp -a` の出力からMACアドレスを探すAddressResolver
pub struct ArpResolver<R: CommandRunner> {
    runner: R,
    timeout: Duration,
}

impl<R: CommandRunner> ArpResolver<R> {
    pub fn new(runner: R, timeout: Duration) -> Self {
        Self { runner, timeout }
    }
}

#[async_trait]
impl<R: CommandRunner> AddressResolver for ArpResolver<R> {
    async fn resolve(&self, target: &str) -> AddressResult {
        let resolved = resolve_host(target, self.timeout).await;
        let candidates = lookup_candidates(target, &resolved);

        let args = vec!["-a".to_string(), arp_query(target, &resolved)];

        let output = match self.runner.run("arp", &args, self.timeout).await {
            Ok(output) => output,
            Err(e) => {
                warn!("Failed to look up neighbor table for {target}: {e}");
                return AddressResult::LookupError;
            }
        };

        // エントリがない場合に非0で終了するarpもあるため終了ステータスは見ない
        match find_hw_addr(&output.stdout, &candidates) {
            Some(addr) => AddressResult::Address(addr),
            None => {
                debug!("No neighbor entry for {target}");
                AddressResult::NotFound
            }
        }
    }
}

/// ホスト名をIPアドレスに解決する
/// 失敗した場合は空のリストを返す
async fn resolve_host(target: &str, timeout_duration: Duration) -> Vec<IpAddr> {
    if let Ok(ip) = target.parse::<IpAddr>() {
        return vec![ip];
    }

    match timeout(timeout_duration, lookup_host((target, 0))).await {
        Ok(Ok(addrs)) => addrs.map(|addr| addr.ip()).collect(),
        Ok(Err(e)) => {
            debug!("Failed to resolve {target}: {e}");
            Vec::new()
        }
        Err(_) => {
            debug!("Resolving {target} timed out");
            Vec::new()
        }
    }
}

/// arpに渡す問い合わせ先を決める
///
/// Windowsのarpはホスト名を受け付けないため、ホスト名は解決済みのアドレスで問い合わせる。
/// ARPテーブルにはIPv4のエントリしかないため、IPv4アドレスを優先する。
fn arp_query(target: &str, resolved: &[IpAddr]) -> String {
    if target.parse::<IpAddr>().is_ok() {
        return target.to_string();
    }
    resolved
        .iter()
        .find(|ip| ip.is_ipv4())
        .map(IpAddr::to_string)
        .unwrap_or_else(|| target.to_string())
}

#[cfg(test)]
mod tests {
    use std::io;

    use mockall::mock;

    use super::*;
    use crate::net_utils::command::{CommandError, CommandOutput};

    mock! {
        Runner {}

        #[async_trait]
        impl CommandRunner for Runner {
            async fn run(
                &self,
                program: &str,
                args: &[String],
                timeout: Duration,
            ) -> Result<CommandOutput, CommandError>;
        }
    }

    fn runner_returning(result: Result<CommandOutput, CommandError>) -> MockRunner {
        let mut runner = MockRunner::new();
        runner
            .expect_run()
            .withf(|program, args, _| {
                program == "arp" && args.first().map(String::as_str) == Some("-a")
            })
            .times(1)
            .returning(move |_, _, _| result.clone());
        runner
    }

    #[tokio::test]
    async fn test_resolve_address() {
        // [正常系] 対象のアドレスを含む行のMACアドレスを返す
        let resolver = ArpResolver::new(
            runner_returning(Ok(CommandOutput::success(
                "? (192.168.1.1) at aa:bb:cc:dd:ee:ff [ether] on eth0\n",
            ))),
            Duration::from_secs(1),
        );
        assert_eq!(
            resolver.resolve("192.168.1.1").await,
            AddressResult::Address("aa:bb:cc:dd:ee:ff".to_string())
        );
    }

    #[tokio::test]
    async fn test_resolve_not_found() {
        // [異常系] 一致する行がない
        let resolver = ArpResolver::new(
            runner_returning(Ok(CommandOutput::success(
                "? (192.168.1.2) at 11:22:33:44:55:66 [ether] on eth0\n",
            ))),
            Duration::from_secs(1),
        );
        assert_eq!(
            resolver.resolve("192.168.1.1").await,
            AddressResult::NotFound
        );

        // [異常系] エントリがないため非0で終了した
        let resolver = ArpResolver::new(
            runner_returning(Ok(CommandOutput::failure("No ARP Entries Found.\n"))),
            Duration::from_secs(1),
        );
        assert_eq!(
            resolver.resolve("192.168.1.1").await,
            AddressResult::NotFound
        );
    }

    #[tokio::test]
    async fn test_resolve_lookup_error() {
        // [異常系] arpコマンドが存在しない
        let resolver = ArpResolver::new(
            runner_returning(Err(CommandError::SpawnError(
                "arp".to_string(),
                io::ErrorKind::NotFound,
            ))),
            Duration::from_secs(1),
        );
        assert_eq!(
            resolver.resolve("192.168.1.1").await,
            AddressResult::LookupError
        );

        // [異常系] arpコマンドがタイムアウトした
        let resolver = ArpResolver::new(
            runner_returning(Err(CommandError::Timeout(
                "arp".to_string(),
                Duration::from_secs(1),
            ))),
            Duration::from_secs(1),
        );
        assert_eq!(
            resolver.resolve("192.168.1.1").await,
            AddressResult::LookupError
        );
    }

    #[tokio::test]
    async fn test_resolve_host_ip_literal() {
        // [正常系] IPアドレスはDNSを使わずにそのまま返す
        let resolved = resolve_host("192.168.1.1", Duration::from_millis(10)).await;
        assert_eq!(resolved, vec!["192.168.1.1".parse::<IpAddr>().unwrap()]);

        let resolved = resolve_host("fe80::1", Duration::from_millis(10)).await;
        assert_eq!(resolved, vec!["fe80::1".parse::<IpAddr>().unwrap()]);
    }

    #[test]
    fn test_arp_query() {
        let ip = |s: &str| s.parse::<IpAddr>().unwrap();

        // [正常系] IPアドレスの対象はそのまま問い合わせる
        assert_eq!(arp_query("192.168.1.5", &[ip("192.168.1.5")]), "192.168.1.5");

        // [正常系] ホスト名はIPv6が先に解決されてもIPv4アドレスで問い合わせる
        let resolved = [ip("2001:db8::5"), ip("192.168.1.5")];
        assert_eq!(arp_query("printer.local", &resolved), "192.168.1.5");

        // [異常系] IPv4アドレスがなければホスト名のまま問い合わせる
        assert_eq!(
            arp_query("printer.local", &[ip("2001:db8::5")]),
            "printer.local"
        );
        assert_eq!(arp_query("printer.local", &[]), "printer.local");
    }

    #[tokio::test]
    async fn test_resolve_hostname() {
        // [正常系] ホスト名は解決したIPv4アドレスでarpに問い合わせ、その行のMACアドレスを返す
        let mut runner = MockRunner::new();
        runner
            .expect_run()
            .withf(|program, args, _| program == "arp" && *args == ["-a", "127.0.0.1"])
            .times(1)
            .returning(|_, _, _| {
                Ok(CommandOutput::success(
                    "? (127.0.0.1) at aa:bb:cc:dd:ee:ff [ether] on lo\n",
                ))
            });
        let resolver = ArpResolver::new(runner, Duration::from_secs(5));
        assert_eq!(
            resolver.resolve("localhost").await,
            AddressResult::Address("aa:bb:cc:dd:ee:ff".to_string())
        );

        // [異常系] 解決できないホスト名は一致する行がない
        let resolver = ArpResolver::new(
            runner_returning(Ok(CommandOutput::success(
                "? (192.168.1.2) at 11:22:33:44:55:66 [ether] on eth0\n",
            ))),
            Duration::from_secs(5),
        );
        assert_eq!(
            resolver.resolve("no-such-host.invalid").await,
            AddressResult::NotFound
        );
    }

    #[test]
    fn test_address_result_display() {
        // [正常系] 表示文字列
        assert_eq!(
            AddressResult::Address("aa:bb:cc:dd:ee:ff".to_string()).to_string(),
            "aa:bb:cc:dd:ee:ff"
        );
        assert_eq!(AddressResult::NotFound.to_string(), "Not found");
        assert_eq!(AddressResult::LookupError.to_string(), "Error");
    }
}
