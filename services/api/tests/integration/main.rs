mod helpers;

mod favorite_test;
mod shopping_cart_test;
mod subscription_test;
