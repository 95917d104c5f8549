use std::str::FromStr;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::{info, Instrument};

use durian_shop::admin_actor::{BackendStatus, DashboardView};
use durian_shop::app_system::{setup_tracing, Collaborators, Config, ShopSystem};
use durian_shop::domain::{PaymentMethod, Role, Session};
use durian_shop::session::{FileSessionStore, SessionProvider};

#[derive(Debug, Parser)]
#[command(name = "durian_shop", about = "Durian shop checkout and admin tools", long_about = None)]
struct Cli {
    #[command(flatten)]
    config: Config,

    #[command(subcommand)]
    command: Command,
}

impl Cli {
    fn load() -> Result<Self, clap::Error> {
        _ = dotenvy::dotenv();

        Self::try_parse()
    }
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Store a session locally, as the login screen would
    Login {
        #[arg(long)]
        user_id: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: Option<String>,
        #[arg(long, default_value = "user")]
        role: Role,
        #[arg(long, env = "JWT_TOKEN", hide_env_values = true)]
        token: String,
    },
    /// Forget the local session
    Logout,
    /// Probe the backend
    Status,
    /// List accounts
    Users {
        /// Include deactivated accounts
        #[arg(long)]
        show_deactivated: bool,
    },
    /// Change an account's role
    SetRole { user_id: String, role: Role },
    /// Deactivate an account; the user is emailed the reason
    Deactivate {
        user_id: String,
        #[arg(long)]
        reason: String,
    },
    /// Reactivate a deactivated account
    Activate { user_id: String },
    /// Delete an account
    Delete {
        user_id: String,
        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },
    /// Submit an order
    Checkout {
        #[arg(long)]
        address: String,
        #[arg(long)]
        phone: String,
        #[arg(long, default_value = "COD")]
        payment: PaymentMethod,
        /// `name:price:quantity`, repeatable
        #[arg(long = "item", required = true)]
        items: Vec<ItemSpec>,
    },
}

/// One `--item name:price:quantity` argument.
#[derive(Debug, Clone)]
struct ItemSpec {
    name: String,
    price: f64,
    quantity: u32,
}

impl FromStr for ItemSpec {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.rsplitn(3, ':');
        let (Some(quantity), Some(price), Some(name)) = (parts.next(), parts.next(), parts.next()) else {
            return Err(format!("expected name:price:quantity, got {s}"));
        };
        Ok(Self {
            name: name.to_string(),
            price: price.parse().map_err(|e| format!("bad price {price}: {e}"))?,
            quantity: quantity.parse().map_err(|e| format!("bad quantity {quantity}: {e}"))?,
        })
    }
}

#[tokio::main]
async fn main() -> Result<(), String> {
    let cli = match Cli::load() {
        Ok(cli) => cli,
        Err(e) => e.exit(),
    };

    setup_tracing(&cli.config.log_level);

    match cli.command {
        Command::Login {
            user_id,
            name,
            email,
            role,
            token,
        } => {
            let session = local_session(&cli.config);
            session
                .sign_in(Session {
                    token,
                    role,
                    user_id,
                    name,
                    email,
                })
                .await
                .map_err(|e| e.to_string())?;
            println!("Signed in.");
            Ok(())
        }
        Command::Logout => {
            local_session(&cli.config)
                .logout()
                .await
                .map_err(|e| e.to_string())?;
            println!("Logged out.");
            Ok(())
        }
        command => {
            let system = ShopSystem::new(Collaborators::from_config(&cli.config)?);
            system.session.resolve().await;

            let span = tracing::info_span!("command");
            let result = run(&system, command).instrument(span).await;

            system.shutdown().await?;
            result
        }
    }
}

fn local_session(config: &Config) -> SessionProvider {
    SessionProvider::new(Arc::new(FileSessionStore::new(&config.session_file)))
}

async fn run(system: &ShopSystem, command: Command) -> Result<(), String> {
    let admin = &system.admin_client;

    match command {
        Command::Login { .. } | Command::Logout => Ok(()),
        Command::Status => {
            admin.retry_status().await.map_err(|e| e.to_string())?;
            let view = admin.view().await.map_err(|e| e.to_string())?;
            match &view.backend {
                BackendStatus::Online(message) => println!("Online: {message}"),
                other => println!("{}", other.label()),
            }
            Ok(())
        }
        Command::Users { show_deactivated } => {
            admin.load().await.map_err(|e| e.to_string())?;
            admin
                .set_show_deactivated(show_deactivated)
                .await
                .map_err(|e| e.to_string())?;
            print_roster(&admin.view().await.map_err(|e| e.to_string())?);
            Ok(())
        }
        Command::SetRole { user_id, role } => {
            admin.load().await.map_err(|e| e.to_string())?;
            admin.change_role(user_id, role).await.map_err(|e| e.to_string())
        }
        Command::Deactivate { user_id, reason } => {
            admin.load().await.map_err(|e| e.to_string())?;
            admin.begin_deactivation(user_id).await.map_err(|e| e.to_string())?;
            admin.set_deactivation_reason(reason).await.map_err(|e| e.to_string())?;
            admin.confirm_deactivation().await.map_err(|e| e.to_string())
        }
        Command::Activate { user_id } => {
            admin.load().await.map_err(|e| e.to_string())?;
            admin.reactivate(user_id).await.map_err(|e| e.to_string())
        }
        Command::Delete { user_id, yes } => {
            admin.load().await.map_err(|e| e.to_string())?;
            admin.begin_delete(user_id).await.map_err(|e| e.to_string())?;
            if !yes {
                admin.dismiss_dialog().await.map_err(|e| e.to_string())?;
                return Err("deletion not confirmed; pass --yes".to_string());
            }
            admin.confirm_delete().await.map_err(|e| e.to_string())
        }
        Command::Checkout {
            address,
            phone,
            payment,
            items,
        } => {
            for item in items {
                system
                    .cart_client
                    .add_item(item.name, item.price, item.quantity)
                    .await
                    .map_err(|e| e.to_string())?;
            }

            let checkout = &system.checkout_client;
            checkout.set_address(address).await.map_err(|e| e.to_string())?;
            checkout.set_phone(phone).await.map_err(|e| e.to_string())?;
            checkout.set_payment_method(payment).await.map_err(|e| e.to_string())?;

            let result = checkout.submit().await.map_err(|e| e.to_string())?;
            info!(transaction_id = ?result.transaction_id, amount = ?result.amount, "Order placed");
            if let Some(id) = result.transaction_id {
                println!("Transaction: {id}");
            }
            Ok(())
        }
    }
}

fn print_roster(view: &DashboardView) {
    if let Some(text) = view.empty_text() {
        println!("{text}");
        return;
    }
    for user in &view.users {
        let state = if user.is_active { "active" } else { "deactivated" };
        println!("{}\t{}\t{}\t{}\t{}", user.id, user.name, user.email, user.role, state);
    }
    println!("{} of {} users shown", view.users.len(), view.total_users);
}
