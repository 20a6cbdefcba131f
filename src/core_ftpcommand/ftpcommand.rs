/// Commands understood by the server.
#[derive(Eq, Hash, PartialEq, Debug, Clone, Copy)]
pub enum FtpCommand {
    User,
    Pass,
    Quit,
    Pwd,
    Cwd,
    Mkd,
    Size,
    Mdtm,
    Type,
    Port,
    Pasv,
    Stor,
    Retr,
    List,
    Noop,
}

impl FtpCommand {
    /// Matches a verb case-insensitively.
    pub fn parse(cmd: &str) -> Option<FtpCommand> {
        match cmd.to_ascii_uppercase().as_str() {
            "USER" => Some(FtpCommand::User),
            "PASS" => Some(FtpCommand::Pass),
            "QUIT" => Some(FtpCommand::Quit),
            "PWD" => Some(FtpCommand::Pwd),
            "CWD" => Some(FtpCommand::Cwd),
            "MKD" => Some(FtpCommand::Mkd),
            "SIZE" => Some(FtpCommand::Size),
            "MDTM" => Some(FtpCommand::Mdtm),
            "TYPE" => Some(FtpCommand::Type),
            "PORT" => Some(FtpCommand::Port),
            "PASV" => Some(FtpCommand::Pasv),
            "STOR" => Some(FtpCommand::Stor),
            "RETR" => Some(FtpCommand::Retr),
            "LIST" => Some(FtpCommand::List),
            "NOOP" => Some(FtpCommand::Noop),
            _ => None,
        }
    }

    /// Commands accepted before login.
    pub fn allowed_before_login(&self) -> bool {
        matches!(self, FtpCommand::User | FtpCommand::Pass | FtpCommand::Quit)
    }
}
