use cadence::{
    cart::{CartLineItem, ProductId},
    pricing::display_amount,
};
use cadence_app::config::AppConfig;
use clap::{Args, Subcommand};
use rust_decimal::Decimal;

#[derive(Debug, Args)]
pub(crate) struct CartCommand {
    #[command(subcommand)]
    command: CartSubcommand,
}

#[derive(Debug, Subcommand)]
enum CartSubcommand {
    /// Add a product, merging with an existing line
    Add(AddArgs),

    /// Set the quantity of a line, within the available stock
    Update(UpdateArgs),

    /// Step a line up by one
    Increment(StepArgs),

    /// Step a line down by one
    Decrement(StepArgs),

    /// Remove a line
    Remove(RemoveArgs),

    /// List the cart lines
    List,

    /// Empty the cart
    Clear,
}

#[derive(Debug, Args)]
struct AddArgs {
    /// Product to add
    #[arg(long)]
    product_id: ProductId,

    /// Quantity to add; the line is clamped to the available stock
    #[arg(long, default_value_t = 1_u32)]
    quantity: u32,

    /// Unit price; when given the catalog lookup is skipped
    #[arg(long)]
    price: Option<Decimal>,

    /// Product name for a priced item
    #[arg(long, requires = "price")]
    name: Option<String>,

    /// Available stock for a priced item
    #[arg(long, default_value_t = 99_u32)]
    stock: u32,
}

#[derive(Debug, Args)]
struct UpdateArgs {
    /// Product whose line to change
    #[arg(long)]
    product_id: ProductId,

    /// New quantity
    #[arg(long)]
    quantity: u32,
}

#[derive(Debug, Args)]
struct StepArgs {
    /// Product whose line to step
    #[arg(long)]
    product_id: ProductId,
}

#[derive(Debug, Args)]
struct RemoveArgs {
    /// Product whose line to remove
    #[arg(long)]
    product_id: ProductId,
}

pub(crate) async fn run(command: CartCommand, config: &AppConfig) -> Result<(), String> {
    let mut cart = config
        .cart
        .open()
        .map_err(|error| format!("failed to open cart: {error}"))?;

    match command.command {
        CartSubcommand::Add(args) => {
            let item = match args.price {
                Some(price) => priced_item(&args, price),
                None => super::context(config)?
                    .catalog
                    .line_item(args.product_id, args.quantity)
                    .await
                    .map_err(|error| format!("failed to look up product: {error}"))?,
            };

            let name = item.name.clone();

            cart.add_within_stock(item).map(|quantity| {
                println!("in cart: {quantity} x {name}");
            })
        }
        CartSubcommand::Update(args) => cart.set_quantity(args.product_id, args.quantity),
        CartSubcommand::Increment(args) => cart
            .increment(args.product_id)
            .map(|quantity| println!("quantity: {quantity}")),
        CartSubcommand::Decrement(args) => cart
            .decrement(args.product_id)
            .map(|quantity| println!("quantity: {quantity}")),
        CartSubcommand::Remove(args) => cart.remove_from_cart(args.product_id),
        CartSubcommand::Clear => cart.clear_cart(),
        CartSubcommand::List => {
            if cart.is_empty() {
                println!("cart is empty");
            }

            for item in cart.items() {
                println!(
                    "{}: {} x {} = {}",
                    item.id,
                    item.quantity,
                    item.name,
                    amount(item.line_total())?
                );
            }

            println!("items: {}", cart.item_count());
            println!("subtotal: {}", amount(cart.total())?);

            Ok(())
        }
    }
    .map_err(|error| format!("failed to update cart: {error}"))
}

fn priced_item(args: &AddArgs, price: Decimal) -> CartLineItem {
    CartLineItem {
        id: args.product_id,
        name: args
            .name
            .clone()
            .unwrap_or_else(|| format!("Product {}", args.product_id)),
        description: String::new(),
        stock: args.stock,
        image: String::new(),
        selling_price: price,
        quantity: args.quantity,
    }
}

fn amount(value: Decimal) -> Result<String, String> {
    display_amount(value).map_err(|error| error.to_string())
}
