use alloy::sol;

sol! {
    #[sol(rpc)]
    interface IPredictionMarket {
        event BetPlaced(uint256 indexed marketId, address indexed user, bool outcome, uint256 amount);

        // Views
        function getMarketInfo(uint256 marketId)
            external
            view
            returns (
                address creator,
                string memory question,
                uint256 endTime,
                bool resolved,
                bool outcome,
                uint256 totalYes,
                uint256 totalNo
            );

        function getUserPosition(uint256 marketId, address user)
            external
            view
            returns (uint256 yesAmount, uint256 noAmount, bool claimed);

        function getUserBets(address user) external view returns (uint256[] memory);
        function calculatePotentialWinnings(uint256 marketId, address user) external view returns (uint256);

        // Entrypoints
        function placeBet(uint256 marketId, bool outcome, uint256 amount) external;
        function claimWinnings(uint256 marketId) external;
    }
}
