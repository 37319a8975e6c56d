use std::net::IpAddr;

/// MACアドレスのオクテット数
const MAC_OCTETS: usize = 6;

/// `arp -a` の出力から対象に一致するエントリのMACアドレスを取り出す
///
/// `candidates` のいずれかと一致するトークンを含む行のうち、
/// 最初にMACアドレスらしいトークンを持つ行の値を表記そのままで返す。
///
/// 対応する出力形式:
/// - Linux/macOS: `? (192.168.1.1) at aa:bb:cc:dd:ee:ff [ether] on eth0`
/// - Windows: `  192.168.1.1           aa-bb-cc-dd-ee-ff     dynamic`
pub(crate) fn find_hw_addr<S: AsRef<str>>(output: &str, candidates: &[S]) -> Option<String> {
    output
        .lines()
        .filter(|line| line_matches(line, candidates))
        .find_map(|line| {
            line.split_whitespace()
                .find(|token| is_hw_addr(token))
                .map(str::to_string)
        })
}

fn line_matches<S: AsRef<str>>(line: &str, candidates: &[S]) -> bool {
    line.split_whitespace().any(|token| {
        let token = token
            .strip_prefix('(')
            .and_then(|t| t.strip_suffix(')'))
            .unwrap_or(token);
        candidates
            .iter()
            .any(|candidate| token.eq_ignore_ascii_case(candidate.as_ref()))
    })
}

/// コロンまたはハイフンで区切られた6つの16進数グループかどうか
///
/// macOSは先頭の0を省略する(`a:b:c:d:e:f`)ため1桁のグループも許容する。
/// IPv6アドレスはグループ数や桁数が合わないため除外される。
pub(crate) fn is_hw_addr(token: &str) -> bool {
    let delimiter = if token.contains(':') {
        ':'
    } else if token.contains('-') {
        '-'
    } else {
        return false;
    };

    let groups = token.split(delimiter).collect::<Vec<_>>();
    groups.len() == MAC_OCTETS
        && groups.iter().all(|group| {
            (1..=2).contains(&group.len()) && group.chars().all(|c| c.is_ascii_hexdigit())
        })
}

/// 対象文字列と、名前解決済みのIPアドレスから照合用の候補一覧を作る
pub(crate) fn lookup_candidates(target: &str, resolved: &[IpAddr]) -> Vec<String> {
    let mut candidates = vec![target.to_string()];
    for ip in resolved {
        let ip = ip.to_string();
        if !candidates.contains(&ip) {
            candidates.push(ip);
        }
    }
    candidates
}
