// End-to-end tests driving a real server over loopback sockets

#[cfg(test)]
mod tests {
    use crate::config::Config;
    use crate::core_auth::Authenticator;
    use crate::core_network::network::start_server;
    use crate::server::ServerContext;
    use std::net::{Ipv4Addr, SocketAddr};
    use std::path::{Path, PathBuf};
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
    use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
    use tokio::net::{TcpListener, TcpStream};

    struct StaticAuthenticator;

    impl Authenticator for StaticAuthenticator {
        fn verify(&self, username: &str, password: &str) -> bool {
            username == "alice" && password == "secret"
        }
    }

    fn test_config(dir: &Path) -> Config {
        let mut config = Config::default();
        config.server.listen_address = "127.0.0.1".to_string();
        config.server.listen_port = 0;
        config.server.pasv_bind_address = "127.0.0.1".to_string();
        config.server.storage_dir = dir.join("storage");
        config.server.data_timeout_secs = 5;
        config.server.upload_buffer_size = 16;
        config.server.download_buffer_size = 16;
        config
    }

    async fn spawn_server(config: Config) -> SocketAddr {
        let context = Arc::new(ServerContext::new(config, Arc::new(StaticAuthenticator)).unwrap());
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(start_server(listener, context));
        addr
    }

    struct Server {
        addr: SocketAddr,
        storage: PathBuf,
        _dir: tempfile::TempDir,
    }

    impl Server {
        async fn start() -> Self {
            let dir = tempfile::tempdir().unwrap();
            let config = test_config(dir.path());
            let storage = config.server.storage_dir.clone();
            let addr = spawn_server(config).await;
            Self {
                addr,
                storage,
                _dir: dir,
            }
        }

        fn put(&self, name: &str, content: &[u8]) {
            std::fs::create_dir_all(&self.storage).unwrap();
            std::fs::write(self.storage.join(name), content).unwrap();
        }

        fn get(&self, name: &str) -> Vec<u8> {
            std::fs::read(self.storage.join(name)).unwrap()
        }
    }

    struct Client {
        reader: BufReader<OwnedReadHalf>,
        writer: OwnedWriteHalf,
    }

    impl Client {
        async fn connect(addr: SocketAddr) -> Self {
            let stream = TcpStream::connect(addr).await.unwrap();
            let (reader, writer) = stream.into_split();
            let mut client = Self {
                reader: BufReader::new(reader),
                writer,
            };
            let greeting = client.reply().await;
            assert!(greeting.starts_with("220 "), "{}", greeting);
            client
        }

        async fn logged_in(addr: SocketAddr) -> Self {
            let mut client = Self::connect(addr).await;
            assert!(client.command("USER alice").await.starts_with("331"));
            assert!(client.command("PASS secret").await.starts_with("230"));
            client
        }

        async fn reply(&mut self) -> String {
            let mut line = String::new();
            tokio::time::timeout(Duration::from_secs(10), self.reader.read_line(&mut line))
                .await
                .expect("reply timed out")
                .unwrap();
            line
        }

        async fn send(&mut self, line: &str) {
            self.writer
                .write_all(format!("{}\r\n", line).as_bytes())
                .await
                .unwrap();
        }

        async fn command(&mut self, line: &str) -> String {
            self.send(line).await;
            self.reply().await
        }

        /// Sends PASV and connects to the announced endpoint.
        async fn passive_data(&mut self) -> TcpStream {
            let reply = self.command("PASV").await;
            assert!(reply.starts_with("227 Entering Passive Mode ("), "{}", reply);
            TcpStream::connect(parse_pasv(&reply)).await.unwrap()
        }

        async fn retr(&mut self, name: &str) -> Vec<u8> {
            let mut data = self.passive_data().await;
            assert!(self.command(&format!("RETR {}", name)).await.starts_with("150"));
            let mut content = Vec::new();
            data.read_to_end(&mut content).await.unwrap();
            assert!(self.reply().await.starts_with("226"));
            content
        }

        async fn stor_chunks(&mut self, name: &str, chunks: &[&[u8]]) {
            let mut data = self.passive_data().await;
            assert!(self.command(&format!("STOR {}", name)).await.starts_with("150"));
            for chunk in chunks {
                data.write_all(chunk).await.unwrap();
                data.flush().await.unwrap();
                tokio::time::sleep(Duration::from_millis(20)).await;
            }
            drop(data);
            assert!(self.reply().await.starts_with("226"));
        }
    }

    /// Waits for the server side of a data connection to be closed.
    async fn assert_closed(data: &mut TcpStream) {
        let mut rest = Vec::new();
        tokio::time::timeout(Duration::from_secs(5), data.read_to_end(&mut rest))
            .await
            .expect("data connection left open")
            .unwrap();
        assert!(rest.is_empty());
    }

    fn parse_pasv(reply: &str) -> SocketAddr {
        let start = reply.find('(').unwrap() + 1;
        let end = reply.find(')').unwrap();
        let n: Vec<u16> = reply[start..end]
            .split(',')
            .map(|part| part.parse().unwrap())
            .collect();
        let ip = Ipv4Addr::new(n[0] as u8, n[1] as u8, n[2] as u8, n[3] as u8);
        SocketAddr::from((ip, n[4] * 256 + n[5]))
    }

    #[tokio::test]
    async fn login_pasv_stor_size_scenario() {
        let server = Server::start().await;
        let mut client = Client::connect(server.addr).await;

        assert!(client.command("USER alice").await.starts_with("331 "));
        assert!(client.command("PASS secret").await.starts_with("230 "));

        let reply = client.command("PASV").await;
        assert!(reply.starts_with("227 Entering Passive Mode (127,0,0,1,"), "{}", reply);
        assert!(reply.ends_with(").\r\n"));
        let mut data = TcpStream::connect(parse_pasv(&reply)).await.unwrap();

        assert_eq!(
            client.command("STOR report.txt").await,
            "150 Opening data connection.\r\n"
        );
        data.write_all(b"hello\n").await.unwrap();
        drop(data);
        assert!(client.reply().await.starts_with("226 "));

        assert_eq!(client.command("SIZE report.txt").await, "213 6\r\n");
        assert_eq!(server.get("report.txt"), b"hello\n");
    }

    #[tokio::test]
    async fn binary_round_trip_is_byte_exact() {
        let server = Server::start().await;
        let mut client = Client::logged_in(server.addr).await;

        let mut payload: Vec<u8> = (0..=255u8).cycle().take(5000).collect();
        payload.extend_from_slice(b"\r\rlone\n\r\n\n\r");

        client.stor_chunks("blob.bin", &[&payload]).await;
        assert_eq!(server.get("blob.bin"), payload);
        assert_eq!(client.retr("blob.bin").await, payload);
    }

    #[tokio::test]
    async fn ascii_round_trip_with_crlf_split_across_reads() {
        let server = Server::start().await;
        let mut client = Client::logged_in(server.addr).await;

        assert_eq!(client.command("TYPE A").await, "200 Type set to A.\r\n");
        client
            .stor_chunks("notes.txt", &[b"one\r", b"\ntwo\r\n\r", b"\nthree"])
            .await;

        assert_eq!(server.get("notes.txt"), b"one\ntwo\n\nthree");
        assert_eq!(client.command("SIZE notes.txt").await, "213 14\r\n");
        assert_eq!(client.retr("notes.txt").await, b"one\r\ntwo\r\n\r\nthree");

        assert!(client.command("TYPE I").await.starts_with("200"));
        assert_eq!(client.retr("notes.txt").await, b"one\ntwo\n\nthree");
    }

    #[tokio::test]
    async fn commands_are_gated_until_login() {
        let server = Server::start().await;
        let mut client = Client::connect(server.addr).await;

        for command in ["NOOP", "PWD", "LIST", "PASV", "RETR a", "SIZE a", "XYZZY"] {
            assert!(
                client.command(command).await.starts_with("530"),
                "{} should need a login",
                command
            );
        }
        assert!(client.command("PASS secret").await.starts_with("503"));
        assert!(client.command("USER").await.starts_with("501"));
        assert!(client.command("USER alice").await.starts_with("331"));
        assert!(client.command("PASS").await.starts_with("501"));
        assert!(client.command("PASS wrong").await.starts_with("530"));
        assert!(client.command("NOOP").await.starts_with("530"));

        assert!(client.command("PASS secret").await.starts_with("230"));
        assert!(client.command("NOOP").await.starts_with("200"));
        assert!(client.command("XYZZY").await.starts_with("502"));
        assert!(client.command("noop").await.starts_with("200"));

        // a second USER keeps the login
        assert!(client.command("USER bob").await.starts_with("331"));
        assert!(client.command("NOOP").await.starts_with("200"));
    }

    #[tokio::test]
    async fn transfers_without_data_channel_get_425_and_touch_nothing() {
        let server = Server::start().await;
        let mut client = Client::logged_in(server.addr).await;

        assert!(client.command("RETR missing.txt").await.starts_with("425"));
        assert!(client.command("STOR new.txt").await.starts_with("425"));
        assert!(client.command("STOR").await.starts_with("425"));
        assert!(client.command("LIST").await.starts_with("425"));
        assert!(!server.storage.exists());
    }

    #[tokio::test]
    async fn traversal_names_are_refused() {
        let server = Server::start().await;
        let mut client = Client::logged_in(server.addr).await;

        let mut data = client.passive_data().await;
        assert!(client
            .command("RETR ../../etc/passwd")
            .await
            .starts_with("550"));
        assert_closed(&mut data).await;

        let mut stor_data = TcpStream::connect(data.peer_addr().unwrap()).await.unwrap();
        assert!(client.command("STOR ../escape.txt").await.starts_with("550"));
        assert_closed(&mut stor_data).await;
        assert!(!server.storage.parent().unwrap().join("escape.txt").exists());

        assert!(client.command("SIZE ../../etc/passwd").await.starts_with("550"));
        assert!(client.command("MDTM ../../etc/passwd").await.starts_with("550"));
    }

    #[tokio::test]
    async fn stalled_upload_is_aborted_and_session_survives() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = test_config(dir.path());
        config.server.data_timeout_secs = 1;
        let addr = spawn_server(config).await;
        let mut client = Client::logged_in(addr).await;

        let mut data = client.passive_data().await;
        assert!(client.command("STOR stalled.txt").await.starts_with("150"));
        // connected but silent
        assert!(client.reply().await.starts_with("426"));
        assert_closed(&mut data).await;

        assert!(client.command("NOOP").await.starts_with("200"));
    }

    #[tokio::test]
    async fn failed_retrievals_close_each_data_connection() {
        let server = Server::start().await;
        let mut client = Client::logged_in(server.addr).await;
        let reply = client.command("PASV").await;
        let endpoint = parse_pasv(&reply);

        for _ in 0..5 {
            let mut data = TcpStream::connect(endpoint).await.unwrap();
            assert!(client.command("RETR missing.txt").await.starts_with("550"));
            let mut buf = [0u8; 8];
            let n = tokio::time::timeout(Duration::from_secs(5), data.read(&mut buf))
                .await
                .expect("data connection left open")
                .unwrap();
            assert_eq!(n, 0);
        }
        assert!(client.command("NOOP").await.starts_with("200"));
    }

    #[tokio::test]
    async fn list_sends_names_then_226() {
        let server = Server::start().await;
        server.put("b.txt", b"2");
        server.put("a.txt", b"1");
        let mut client = Client::logged_in(server.addr).await;

        let mut data = client.passive_data().await;
        assert!(client.command("LIST").await.starts_with("150"));
        let mut listing = Vec::new();
        data.read_to_end(&mut listing).await.unwrap();
        assert_eq!(listing, b"a.txt\r\nb.txt\r\n");
        assert!(client.reply().await.starts_with("226"));

        // the passive listener serves the next transfer too
        assert_eq!(client.retr("a.txt").await, b"1");
    }

    #[tokio::test]
    async fn list_of_missing_root_is_450() {
        let server = Server::start().await;
        let mut client = Client::logged_in(server.addr).await;

        let mut data = client.passive_data().await;
        assert!(client.command("LIST").await.starts_with("450"));
        let mut rest = Vec::new();
        data.read_to_end(&mut rest).await.unwrap();
        assert!(rest.is_empty());
    }

    #[tokio::test]
    async fn active_mode_connects_to_the_client() {
        let server = Server::start().await;
        server.put("active.txt", b"over port");
        let mut client = Client::logged_in(server.addr).await;

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let command = format!("PORT 127,0,0,1,{},{}", port / 256, port % 256);

        let (reply, accepted) = tokio::join!(client.command(&command), listener.accept());
        assert!(reply.starts_with("200"), "{}", reply);
        let (mut data, _) = accepted.unwrap();

        assert!(client.command("RETR active.txt").await.starts_with("150"));
        let mut content = Vec::new();
        data.read_to_end(&mut content).await.unwrap();
        assert_eq!(content, b"over port");
        assert!(client.reply().await.starts_with("226"));

        // the connected socket served exactly one transfer
        assert!(client.command("RETR active.txt").await.starts_with("425"));
    }

    #[tokio::test]
    async fn bad_port_arguments_and_unreachable_clients() {
        let server = Server::start().await;
        let mut client = Client::logged_in(server.addr).await;

        assert!(client.command("PORT").await.starts_with("501"));
        assert!(client.command("PORT 127,0,0,1,300,1").await.starts_with("501"));
        assert!(client.command("PORT 127,0,0,1,4").await.starts_with("501"));

        let port = {
            let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
            listener.local_addr().unwrap().port()
        };
        let command = format!("PORT 127,0,0,1,{},{}", port / 256, port % 256);
        assert!(client.command(&command).await.starts_with("425"));
        assert!(client.command("LIST").await.starts_with("425"));
    }

    #[tokio::test]
    async fn new_pasv_replaces_the_previous_listener() {
        let server = Server::start().await;
        let mut client = Client::logged_in(server.addr).await;

        server.put("x.txt", b"x");

        let first = parse_pasv(&client.command("PASV").await);
        let second = parse_pasv(&client.command("PASV").await);
        if first != second {
            assert!(TcpStream::connect(first).await.is_err());
        }

        let mut data = TcpStream::connect(second).await.unwrap();
        assert!(client.command("RETR x.txt").await.starts_with("150"));
        let mut content = Vec::new();
        data.read_to_end(&mut content).await.unwrap();
        assert_eq!(content, b"x");
        assert!(client.reply().await.starts_with("226"));
    }

    #[tokio::test]
    async fn metadata_commands() {
        let server = Server::start().await;
        server.put("file.txt", b"12345");
        let mut client = Client::logged_in(server.addr).await;

        assert_eq!(
            client.command("PWD").await,
            "257 \"/storage\" is the current directory.\r\n"
        );
        assert!(client.command("CWD /storage").await.starts_with("250"));
        assert!(client.command("CWD /tmp").await.starts_with("550"));
        assert!(client.command("CWD").await.starts_with("501"));
        assert!(client.command("MKD /storage").await.starts_with("257"));
        assert!(client.command("MKD newdir").await.starts_with("550"));
        assert!(client.command("MKD").await.starts_with("501"));
        assert!(client.command("TYPE E").await.starts_with("504"));
        assert!(client.command("TYPE").await.starts_with("501"));
        assert_eq!(client.command("SIZE file.txt").await, "213 5\r\n");
        assert!(client.command("SIZE nope.txt").await.starts_with("550"));
        assert!(client.command("SIZE").await.starts_with("501"));

        let mdtm = client.command("MDTM file.txt").await;
        let stamp = mdtm.trim_end().strip_prefix("213 ").unwrap();
        assert_eq!(stamp.len(), 14);
        assert!(stamp.bytes().all(|b| b.is_ascii_digit()));
        assert!(client.command("MDTM nope.txt").await.starts_with("550"));
        assert!(client.command("NOOP").await.starts_with("200"));
    }

    #[tokio::test]
    async fn blank_lines_get_no_reply() {
        let server = Server::start().await;
        let mut client = Client::connect(server.addr).await;

        client.send("").await;
        client.send("   ").await;
        assert!(client.command("NOOP").await.starts_with("530"));
    }

    #[tokio::test]
    async fn quit_closes_the_session_without_login() {
        let server = Server::start().await;
        let mut client = Client::connect(server.addr).await;

        assert!(client.command("QUIT").await.starts_with("221"));
        let mut rest = String::new();
        let n = client.reader.read_line(&mut rest).await.unwrap();
        assert_eq!(n, 0);
    }

    #[tokio::test]
    async fn session_limit_refuses_extra_connections() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = test_config(dir.path());
        config.server.max_sessions = 1;
        let addr = spawn_server(config).await;

        let mut first = Client::connect(addr).await;

        let stream = TcpStream::connect(addr).await.unwrap();
        let mut reader = BufReader::new(stream);
        let mut line = String::new();
        reader.read_line(&mut line).await.unwrap();
        assert!(line.starts_with("421"), "{}", line);

        assert!(first.command("QUIT").await.starts_with("221"));
    }

    #[tokio::test]
    async fn idle_sessions_are_closed() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = test_config(dir.path());
        config.server.idle_timeout_secs = 1;
        let addr = spawn_server(config).await;

        let mut client = Client::connect(addr).await;
        assert!(client.reply().await.starts_with("421"));
    }
}
