//! Minimal UDP DNS responder for CLI tests.
//!
//! `host.test` and `other.test` have A records; every other name is NXDOMAIN.

use hickory_resolver::proto::op::{Message, MessageType, OpCode, ResponseCode};
use hickory_resolver::proto::rr::rdata::A;
use hickory_resolver::proto::rr::{RData, Record, RecordType};
use std::net::{SocketAddr, UdpSocket};
use std::thread;

pub struct MockDns {
    pub addr: SocketAddr,
}

impl MockDns {
    pub fn start() -> Self {
        let socket = UdpSocket::bind("127.0.0.1:0").expect("bind mock dns socket");
        let addr = socket.local_addr().expect("mock dns local addr");

        thread::spawn(move || {
            let mut buf = [0u8; 4096];
            while let Ok((len, peer)) = socket.recv_from(&mut buf) {
                if let Some(response) = respond(&buf[..len]) {
                    let _ = socket.send_to(&response, peer);
                }
            }
        });

        Self { addr }
    }

    pub fn port(&self) -> String {
        self.addr.port().to_string()
    }
}

fn respond(packet: &[u8]) -> Option<Vec<u8>> {
    let request = Message::from_vec(packet).ok()?;
    let query = request.queries().first()?.clone();
    let qname = query.name().clone();
    let name = qname.to_string().to_lowercase();

    let mut response = Message::new();
    response
        .set_id(request.id())
        .set_message_type(MessageType::Response)
        .set_op_code(OpCode::Query)
        .set_recursion_desired(request.recursion_desired())
        .set_recursion_available(true);
    response.add_query(query.clone());

    let octets: &[u8] = match name.trim_end_matches('.') {
        "host.test" => &[10, 11],
        "other.test" => &[20],
        _ => {
            response.set_response_code(ResponseCode::NXDomain);
            &[]
        }
    };
    if query.query_type() == RecordType::A {
        for octet in octets {
            response.add_answer(Record::from_rdata(
                qname.clone(),
                60,
                RData::A(A::new(192, 0, 2, *octet)),
            ));
        }
    }

    response.to_vec().ok()
}
