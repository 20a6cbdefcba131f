use crate::core_ftpcommand::ftpcommand::FtpCommand;
use crate::core_ftpcommand::{
    cwd, list, mdtm, mkd, noop, pass, pwd, quit, retr, size, stor, type_, user,
};
use crate::core_network::{pasv, port};
use crate::helpers::send_reply;
use crate::server::ServerContext;
use crate::session::Session;
use log::{debug, warn};
use tokio::io::AsyncWrite;

/// What the control loop does once a command has been answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    Continue,
    Quit,
}

/// Runs one tokenized command line and writes its reply.
///
/// `tokens` must not be empty; token 0 is the verb. Every path writes the
/// command's reply before returning, so the caller can read the next line
/// straight away. An `Err` means the control connection is gone.
pub async fn dispatch<W>(
    writer: &mut W,
    context: &ServerContext,
    session: &mut Session,
    tokens: &[String],
) -> Result<CommandOutcome, std::io::Error>
where
    W: AsyncWrite + Unpin,
{
    let Some((verb, args)) = tokens.split_first() else {
        return Ok(CommandOutcome::Continue);
    };
    let command = FtpCommand::parse(verb);
    debug!("Dispatching {:?} with {} argument(s)", command, args.len());

    let allowed = command.is_some_and(|c| c.allowed_before_login());
    if !session.is_authenticated && !allowed {
        warn!("{} rejected before login", verb);
        send_reply(writer, "530 Please log in first.").await?;
        return Ok(CommandOutcome::Continue);
    }

    let Some(command) = command else {
        send_reply(writer, "502 Command not implemented.").await?;
        return Ok(CommandOutcome::Continue);
    };

    match command {
        FtpCommand::User => user::handle_user_command(writer, session, args).await?,
        FtpCommand::Pass => pass::handle_pass_command(writer, context, session, args).await?,
        FtpCommand::Quit => {
            quit::handle_quit_command(writer).await?;
            return Ok(CommandOutcome::Quit);
        }
        FtpCommand::Pwd => pwd::handle_pwd_command(writer, context).await?,
        FtpCommand::Cwd => cwd::handle_cwd_command(writer, context, args).await?,
        FtpCommand::Mkd => mkd::handle_mkd_command(writer, context, args).await?,
        FtpCommand::Size => size::handle_size_command(writer, context, args).await?,
        FtpCommand::Mdtm => mdtm::handle_mdtm_command(writer, context, args).await?,
        FtpCommand::Type => type_::handle_type_command(writer, session, args).await?,
        FtpCommand::Port => port::handle_port_command(writer, context, session, args).await?,
        FtpCommand::Pasv => pasv::handle_pasv_command(writer, context, session).await?,
        FtpCommand::Stor => stor::handle_stor_command(writer, context, session, args).await?,
        FtpCommand::Retr => retr::handle_retr_command(writer, context, session, args).await?,
        FtpCommand::List => list::handle_list_command(writer, context, session).await?,
        FtpCommand::Noop => noop::handle_noop_command(writer).await?,
    }

    Ok(CommandOutcome::Continue)
}
