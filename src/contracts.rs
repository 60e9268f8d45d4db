//! Contract bindings for the venues and ERC-20 tokens
//!
//! ABI encoding and the `eth_call`/`eth_sendTransaction` plumbing are
//! generated by `alloy::sol!`.

alloy::sol! {
    #[sol(rpc)]
    interface IERC20 {
        function name() external view returns (string memory);
        function symbol() external view returns (string memory);
        function decimals() external view returns (uint8);
        function totalSupply() external view returns (uint256);
        function balanceOf(address owner) external view returns (uint256 balance);
        function allowance(address owner, address spender) external view returns (uint256);
        function approve(address spender, uint256 amount) external returns (bool);
    }

    #[sol(rpc)]
    interface IPancakeRouter {
        function getAmountsOut(uint amountIn, address[] calldata path)
            external
            view
            returns (uint[] memory amounts);

        function swapExactETHForTokens(
            uint amountOutMin,
            address[] calldata path,
            address to,
            uint deadline
        ) external payable returns (uint[] memory amounts);

        function swapExactTokensForETH(
            uint amountIn,
            uint amountOutMin,
            address[] calldata path,
            address to,
            uint deadline
        ) external returns (uint[] memory amounts);
    }

    #[sol(rpc)]
    interface IFourMemeFactory {
        function createToken(
            string calldata name,
            string calldata symbol,
            string calldata description,
            string calldata logoUrl
        ) external payable returns (address token);

        function getBuyQuote(address token, uint256 bnbAmount) external view returns (uint256);
        function getSellQuote(address token, uint256 tokenAmount) external view returns (uint256);

        function buy(address token, uint256 minTokensOut) external payable;
        function sell(address token, uint256 tokenAmount, uint256 minBnbOut) external;
    }
}
