use actix_web::HttpRequest;

const IPV4_MAPPED_PREFIX: &str = "::ffff:";

/// Resolve the visitor's IP address.
///
/// Order: first entry of `X-Forwarded-For`, then `X-Real-IP`, then the peer
/// address of the connection. IPv4-mapped IPv6 addresses are reported as
/// plain IPv4.
pub fn client_ip(req: &HttpRequest) -> String {
    let headers = req.headers();

    let forwarded = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty());

    let real_ip = || {
        headers
            .get("x-real-ip")
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
    };

    let ip = match forwarded.or_else(real_ip) {
        Some(ip) => ip.to_string(),
        None => match req.peer_addr() {
            Some(addr) => addr.ip().to_string(),
            None => "unknown".to_string(),
        },
    };

    strip_ipv4_mapped(&ip).to_string()
}

fn strip_ipv4_mapped(ip: &str) -> &str {
    match ip.get(..IPV4_MAPPED_PREFIX.len()) {
        Some(prefix) if prefix.eq_ignore_ascii_case(IPV4_MAPPED_PREFIX) => {
            let rest = &ip[IPV4_MAPPED_PREFIX.len()..];
            if rest.contains('.') { rest } else { ip }
        }
        _ => ip,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;
    use std::net::SocketAddr;

    fn peer(addr: &str) -> SocketAddr {
        addr.parse().unwrap()
    }

    #[test]
    fn prefers_first_forwarded_entry() {
        let req = TestRequest::default()
            .insert_header(("X-Forwarded-For", " 203.0.113.7 , 10.0.0.1"))
            .insert_header(("X-Real-IP", "198.51.100.2"))
            .peer_addr(peer("127.0.0.1:4000"))
            .to_http_request();
        assert_eq!(client_ip(&req), "203.0.113.7");
    }

    #[test]
    fn falls_back_to_real_ip_header() {
        let req = TestRequest::default()
            .insert_header(("X-Forwarded-For", "  "))
            .insert_header(("X-Real-IP", "198.51.100.2"))
            .peer_addr(peer("127.0.0.1:4000"))
            .to_http_request();
        assert_eq!(client_ip(&req), "198.51.100.2");
    }

    #[test]
    fn falls_back_to_peer_address() {
        let req = TestRequest::default()
            .peer_addr(peer("192.0.2.10:5555"))
            .to_http_request();
        assert_eq!(client_ip(&req), "192.0.2.10");
    }

    #[test]
    fn unknown_without_any_source() {
        let req = TestRequest::default().to_http_request();
        assert_eq!(client_ip(&req), "unknown");
    }

    #[test]
    fn strips_ipv4_mapped_prefix() {
        let req = TestRequest::default()
            .insert_header(("X-Forwarded-For", "::ffff:203.0.113.9"))
            .to_http_request();
        assert_eq!(client_ip(&req), "203.0.113.9");

        let req = TestRequest::default()
            .peer_addr(peer("[::ffff:192.0.2.1]:8080"))
            .to_http_request();
        assert_eq!(client_ip(&req), "192.0.2.1");
    }

    #[test]
    fn keeps_plain_ipv6() {
        assert_eq!(strip_ipv4_mapped("::ffff"), "::ffff");
        assert_eq!(strip_ipv4_mapped("2001:db8::1"), "2001:db8::1");
    }
}
