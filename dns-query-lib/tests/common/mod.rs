//! A tiny UDP DNS responder for offline tests.
//!
//! Zone served (names are case-insensitive):
//! - `host.test`      A 192.0.2.10, 192.0.2.11; MX 10 mail.host.test.;
//!                    TXT "v=spf1" "-all" and TXT "hello world"; nothing else
//! - `*.ok.test`      A 192.0.2.N where N is the digits in the first label (default 1)
//! - `late*.ok.test`  same as above but answered after three times the base delay
//! - `silent*`        never answered
//! - anything else    NXDOMAIN

#![allow(dead_code)]

use dns_query_lib::{DnsQuerier, QueryConfig};
use hickory_resolver::proto::op::{Message, MessageType, OpCode, ResponseCode};
use hickory_resolver::proto::rr::rdata::{A, MX, TXT};
use hickory_resolver::proto::rr::{Name, RData, Record, RecordType};
use std::net::{SocketAddr, UdpSocket};
use std::thread;
use std::time::Duration;

pub struct MockDns {
    pub addr: SocketAddr,
}

impl MockDns {
    /// Start a responder that waits `delay` before each answer.
    pub fn start(delay: Duration) -> Self {
        let socket = UdpSocket::bind("127.0.0.1:0").expect("bind mock dns socket");
        let addr = socket.local_addr().expect("mock dns local addr");

        thread::spawn(move || {
            let mut buf = [0u8; 4096];
            loop {
                let (len, peer) = match socket.recv_from(&mut buf) {
                    Ok(received) => received,
                    Err(_) => return,
                };
                let packet = buf[..len].to_vec();
                let Ok(reply_socket) = socket.try_clone() else {
                    return;
                };
                thread::spawn(move || {
                    if let Some((response, late)) = respond(&packet) {
                        thread::sleep(if late { delay * 3 } else { delay });
                        let _ = reply_socket.send_to(&response, peer);
                    }
                });
            }
        });

        Self { addr }
    }

    /// Config pointing at this responder.
    pub fn config(&self) -> QueryConfig {
        QueryConfig::default()
            .with_nameserver(self.addr.ip())
            .with_port(self.addr.port())
    }

    pub fn querier(&self, concurrency: usize, timeout: Duration) -> DnsQuerier {
        DnsQuerier::with_config(
            self.config()
                .with_concurrency(concurrency)
                .with_timeout(timeout),
        )
        .expect("build querier")
    }
}

fn respond(packet: &[u8]) -> Option<(Vec<u8>, bool)> {
    let request = Message::from_vec(packet).ok()?;
    let query = request.queries().first()?.clone();
    let qname = query.name().clone();
    let name = qname.to_string().to_lowercase();
    let name = name.trim_end_matches('.');

    if name.starts_with("silent") {
        return None;
    }

    let mut response = Message::new();
    response
        .set_id(request.id())
        .set_message_type(MessageType::Response)
        .set_op_code(OpCode::Query)
        .set_recursion_desired(request.recursion_desired())
        .set_recursion_available(true)
        .set_authoritative(true);
    response.add_query(query.clone());

    let a = |octet: u8| Record::from_rdata(qname.clone(), 60, RData::A(A::new(192, 0, 2, octet)));

    match (name, query.query_type()) {
        ("host.test", RecordType::A) => {
            response.add_answer(a(10));
            response.add_answer(a(11));
        }
        ("host.test", RecordType::MX) => {
            let exchange = Name::from_ascii("mail.host.test.").ok()?;
            response.add_answer(Record::from_rdata(
                qname.clone(),
                60,
                RData::MX(MX::new(10, exchange)),
            ));
        }
        ("host.test", RecordType::TXT) => {
            let txt = |strings: &[&str]| {
                let strings = strings.iter().map(|s| s.to_string()).collect();
                Record::from_rdata(qname.clone(), 60, RData::TXT(TXT::new(strings)))
            };
            response.add_answer(txt(&["v=spf1", "-all"]));
            response.add_answer(txt(&["hello world"]));
        }
        ("host.test", _) => {}
        (n, RecordType::A) if n.ends_with(".ok.test") => {
            let label = n.split('.').next().unwrap_or("");
            let digits: String = label.chars().filter(|c| c.is_ascii_digit()).collect();
            response.add_answer(a(digits.parse().unwrap_or(1)));
        }
        _ => {
            response.set_response_code(ResponseCode::NXDomain);
        }
    }

    let late = name.starts_with("late");
    response.to_vec().ok().map(|bytes| (bytes, late))
}
